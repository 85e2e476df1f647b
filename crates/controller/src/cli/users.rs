// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::auth::password::hash_password;
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use db_storage::constraints;
use db_storage::users::{NewUser, User, UserId};
use tabled::{Style, Table, Tabled};

/// Longest username the `users` table accepts
const MAX_USERNAME_LENGTH: usize = 64;

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab_case")]
pub enum Command {
    /// List all users
    List,
    /// Create a new user that can authenticate with username and password
    Add {
        /// Name the user authenticates with and is shown to other table members
        username: String,
        /// Password of the new user
        #[clap(long)]
        password: String,
    },
}

pub fn handle_command(settings: Settings, command: Command) -> Result<()> {
    match command {
        Command::List => list_all_users(settings),
        Command::Add { username, password } => add_user(settings, &username, &password),
    }
}

#[derive(Tabled)]
struct UserTableRow {
    id: UserId,
    username: String,
    created_at: DateTime<Utc>,
}

impl UserTableRow {
    fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Implementation of the `receipt-tables users list` command
fn list_all_users(settings: Settings) -> Result<()> {
    let db = super::connect_db(&settings)?;
    let mut conn = db.get_conn()?;

    let users = User::get_all(&mut conn)?;
    let rows: Vec<UserTableRow> = users.into_iter().map(UserTableRow::from_user).collect();

    println!("{}", Table::new(rows).with(Style::psql()));

    Ok(())
}

/// Implementation of the `receipt-tables users add <username> --password <password>` command
fn add_user(settings: Settings, username: &str, password: &str) -> Result<()> {
    validate_username(username)?;

    if password.is_empty() {
        bail!("The password must not be empty");
    }

    let password_hash = hash_password(password).context("Failed to hash password")?;

    let db = super::connect_db(&settings)?;
    let mut conn = db.get_conn()?;

    let user = NewUser {
        username,
        password_hash: &password_hash,
    }
    .insert(&mut conn);

    match user {
        Ok(user) => {
            println!("Created user {} with id {}", user.username, user.id);
            Ok(())
        }
        Err(e) if e.unique_violation() == Some(constraints::USERNAME_UNIQUE) => {
            bail!("A user named {username:?} already exists")
        }
        Err(e) => Err(e.into()),
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        bail!("The username must not be empty");
    }

    if username.len() > MAX_USERNAME_LENGTH {
        bail!("The username must not be longer than {MAX_USERNAME_LENGTH} bytes");
    }

    if username.contains(':') {
        bail!("The username must not contain ':' as it is used in HTTP Basic credentials");
    }

    if username.contains('\0') {
        bail!("The username must not contain NUL characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("  ").is_err());
        assert!(validate_username("al:ice").is_err());
        assert!(validate_username("al\0ice").is_err());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }
}
