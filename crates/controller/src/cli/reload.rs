// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::{Context, Error, Result};
use nix::sys::signal::{kill, SIGHUP};
use sysinfo::{
    get_current_pid, Pid, PidExt, ProcessExt, ProcessRefreshKind, RefreshKind, System, SystemExt,
};

/// Sends SIGHUP to every other running process with the name of this executable
///
/// The controller reloads the reloadable part of its settings when receiving SIGHUP.
pub fn trigger_reload() -> Result<()> {
    let controllers = running_controllers()?;

    if controllers.is_empty() {
        println!("There is currently no other controller process running");
        return Ok(());
    }

    for pid in controllers {
        kill(nix::unistd::Pid::from_raw(pid.as_u32() as i32), SIGHUP)
            .with_context(|| format!("Failed to send SIGHUP to process {pid}"))?;

        println!("Sent reload signal to process {pid}");
    }

    Ok(())
}

fn running_controllers() -> Result<Vec<Pid>> {
    let system = System::new_with_specifics(
        RefreshKind::default().with_processes(ProcessRefreshKind::everything()),
    );

    let own_pid = get_current_pid().map_err(Error::msg)?;
    let own_name = system
        .process(own_pid)
        .map(|process| process.name().to_owned())
        .context("Failed to inspect the current process")?;

    Ok(system
        .processes()
        .iter()
        .filter(|(pid, process)| **pid != own_pid && process.name() == own_name)
        .map(|(pid, _)| *pid)
        .collect())
}
