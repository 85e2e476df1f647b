// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

#![allow(clippy::extra_unused_lifetimes)]

//! Contains the database ORM and database migrations for the receipt tables controller.
//! Builds upon receipt-tables-database
//!
//! Queries are implemented as associated functions of the models which take a
//! `&mut DbConnection`, so callers decide about transaction boundaries:
//! ```rust,ignore
//! conn.transaction(|conn| {
//!     let table = NewTable::new(key).insert(conn)?;
//!     NewUserTable { user_id, table_id: table.id }.insert(conn)?;
//!     Ok(table)
//! })
//! ```

mod schema;

pub mod migrations;
pub mod tables;
pub mod users;

/// Names of the constraints the controller maps to domain errors
pub mod constraints {
    /// Unique constraint on `tables.table_key`
    pub const TABLE_KEY_UNIQUE: &str = "tables_table_key_key";
    /// Unique constraint on `user_tables.user_id`, a user can be member of one table only
    pub const USER_TABLE_USER_UNIQUE: &str = "user_tables_user_id_key";
    /// Foreign key from `user_tables.table_id` to `tables.id`
    pub const USER_TABLE_TABLE_FKEY: &str = "user_tables_table_id_fkey";
    /// Unique constraint on `users.username`
    pub const USERNAME_UNIQUE: &str = "users_username_key";
}
