// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::settings::Settings;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use db_storage::tables::{Table, TableId, TableKey, UserTable};
use tabled::{Style, Tabled};

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// List all tables and their member count
    List,
}

pub fn handle_command(settings: Settings, command: Command) -> Result<()> {
    match command {
        Command::List => list_all_tables(settings),
    }
}

#[derive(Tabled)]
struct TableRow {
    id: TableId,
    key: TableKey,
    created_at: DateTime<Utc>,
    members: i64,
}

/// Implementation of the `receipt-tables tables list` command
fn list_all_tables(settings: Settings) -> Result<()> {
    let db = super::connect_db(&settings)?;
    let mut conn = db.get_conn()?;

    let rows = Table::get_all(&mut conn)?
        .into_iter()
        .map(|table| {
            Ok(TableRow {
                members: UserTable::count_for_table(&mut conn, table.id)?,
                id: table.id,
                key: table.table_key,
                created_at: table.table_date,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", tabled::Table::new(rows).with(Style::psql()));

    Ok(())
}
