// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use database::Db;
use std::path::PathBuf;

mod reload;
mod tables;
mod users;

#[derive(Parser, Debug, Clone)]
#[clap(name = "receipt-tables", version)]
pub struct Args {
    #[clap(
        short,
        long,
        default_value = "config.toml",
        help = "Specify path to configuration file"
    )]
    pub config: PathBuf,

    /// Triggers a reload of the settings of all running controller processes
    #[clap(long)]
    pub reload: bool,

    #[clap(subcommand)]
    cmd: Option<SubCommand>,
}

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
enum SubCommand {
    /// Migrate the db. This is done automatically during start of the controller,
    /// but can be done without starting the controller using this command.
    MigrateDb,

    /// Manage the users that can authenticate against the controller
    #[clap(subcommand)]
    Users(users::Command),

    /// Inspect the currently existing tables
    #[clap(subcommand)]
    Tables(tables::Command),
}

impl Args {
    /// Returns true if we want to startup the controller after we finished the cli part
    pub fn controller_should_start(&self) -> bool {
        !(self.reload || self.cmd.is_some())
    }
}

/// Parses the CLI-Arguments into [`Args`]
///
/// Also runs (optional) cli commands if necessary
pub async fn parse_args() -> Result<Args> {
    let args = Args::parse();

    if args.reload {
        reload::trigger_reload()?;
    }

    if let Some(sub_command) = args.cmd.clone() {
        let settings = Settings::load(&args.config)?;

        match sub_command {
            SubCommand::MigrateDb => {
                let report = db_storage::migrations::migrate_from_url(&settings.database.url)
                    .await
                    .context("Failed to migrate database")?;

                println!(
                    "Applied {} migrations",
                    report.applied_migrations().len()
                );
            }
            SubCommand::Users(command) => users::handle_command(settings, command)?,
            SubCommand::Tables(command) => tables::handle_command(settings, command)?,
        }
    }

    Ok(args)
}

/// Connect to the configured database with a pool sized for a single command
fn connect_db(settings: &Settings) -> Result<Db> {
    Db::connect_url(&settings.database.url, 1, None).context("Failed to connect to database")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn server_starts_without_subcommand() {
        let args = Args::try_parse_from(["receipt-tables", "-c", "other.toml"]).unwrap();

        assert_eq!(args.config, PathBuf::from("other.toml"));
        assert!(args.controller_should_start());
    }

    #[test]
    fn subcommands_do_not_start_the_server() {
        let args = Args::try_parse_from([
            "receipt-tables",
            "users",
            "add",
            "alice",
            "--password",
            "secret",
        ])
        .unwrap();

        assert!(!args.controller_should_start());
        assert!(matches!(
            args.cmd,
            Some(SubCommand::Users(users::Command::Add { ref username, ref password }))
                if username == "alice" && password == "secret"
        ));

        let args = Args::try_parse_from(["receipt-tables", "tables", "list"]).unwrap();
        assert!(matches!(
            args.cmd,
            Some(SubCommand::Tables(tables::Command::List))
        ));

        let args = Args::try_parse_from(["receipt-tables", "--reload"]).unwrap();
        assert!(!args.controller_should_start());
    }
}
