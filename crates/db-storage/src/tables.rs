// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the table and membership specific database structs and queries
//!
//! A table only exists while at least one [`UserTable`] row references it. Keeping that
//! invariant is up to the caller, these functions do not open transactions by themselves.
use super::schema::{tables, user_tables, users};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;
use types::core::UserId;

pub use types::core::{TableId, TableKey};

/// Diesel table struct
///
/// Represents a row of `tables`
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = tables)]
pub struct Table {
    pub id: TableId,
    pub table_key: TableKey,
    pub table_date: DateTime<Utc>,
}

impl Table {
    #[tracing::instrument(err, skip_all)]
    pub fn get_by_key(conn: &mut DbConnection, table_key: &TableKey) -> Result<Option<Table>> {
        let table = tables::table
            .filter(tables::table_key.eq(table_key))
            .get_result(conn)
            .optional()?;

        Ok(table)
    }

    /// Returns true if a table with the given key exists
    #[tracing::instrument(err, skip_all)]
    pub fn key_exists(conn: &mut DbConnection, table_key: &TableKey) -> Result<bool> {
        let exists = diesel::select(diesel::dsl::exists(
            tables::table.filter(tables::table_key.eq(table_key)),
        ))
        .get_result(conn)?;

        Ok(exists)
    }

    /// Get the table the given user currently is a member of
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_user(conn: &mut DbConnection, user_id: UserId) -> Result<Option<Table>> {
        let table = user_tables::table
            .inner_join(tables::table)
            .filter(user_tables::user_id.eq(user_id))
            .select(tables::all_columns)
            .get_result(conn)
            .optional()?;

        Ok(table)
    }

    /// Get the table by key and take a `FOR SHARE` lock on its row
    ///
    /// Must be called inside a transaction. Blocks concurrent deletions of the table until
    /// the transaction ends.
    #[tracing::instrument(err, skip_all)]
    pub fn get_by_key_for_share(
        conn: &mut DbConnection,
        table_key: &TableKey,
    ) -> Result<Option<Table>> {
        let table = tables::table
            .filter(tables::table_key.eq(table_key))
            .for_share()
            .get_result(conn)
            .optional()?;

        Ok(table)
    }

    /// Get the table and take a `FOR SHARE` lock on its row
    ///
    /// Must be called inside a transaction. Waits for a member that is leaving the table.
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_share(conn: &mut DbConnection, table_id: TableId) -> Result<Option<Table>> {
        let table = tables::table
            .filter(tables::id.eq(table_id))
            .for_share()
            .get_result(conn)
            .optional()?;

        Ok(table)
    }

    /// Get the table and take a `FOR UPDATE` lock on its row
    ///
    /// Must be called inside a transaction.
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_update(conn: &mut DbConnection, table_id: TableId) -> Result<Option<Table>> {
        let table = tables::table
            .filter(tables::id.eq(table_id))
            .for_update()
            .get_result(conn)
            .optional()?;

        Ok(table)
    }

    /// Get all tables ordered by their creation date
    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection) -> Result<Vec<Table>> {
        let tables = tables::table
            .order_by((tables::table_date, tables::id))
            .load(conn)?;

        Ok(tables)
    }

    /// Delete the table with the given id, returns the number of deleted rows
    #[tracing::instrument(err, skip_all)]
    pub fn delete_by_id(conn: &mut DbConnection, table_id: TableId) -> Result<usize> {
        let deleted = diesel::delete(tables::table.filter(tables::id.eq(table_id))).execute(conn)?;

        Ok(deleted)
    }
}

/// Diesel insertable table struct
#[derive(Debug, Insertable)]
#[diesel(table_name = tables)]
pub struct NewTable<'a> {
    pub table_key: &'a TableKey,
    pub table_date: DateTime<Utc>,
}

impl<'a> NewTable<'a> {
    pub fn new(table_key: &'a TableKey) -> Self {
        Self {
            table_key,
            table_date: Utc::now(),
        }
    }

    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Table> {
        let table = diesel::insert_into(tables::table)
            .values(self)
            .get_result(conn)?;

        Ok(table)
    }
}

/// Membership of a user in a table
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = user_tables)]
pub struct UserTable {
    pub id: i64,
    pub user_id: UserId,
    pub table_id: TableId,
    pub joined_at: DateTime<Utc>,
}

/// A member of a table as listed to other members
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct Member {
    pub user_id: UserId,
    pub username: String,
}

impl UserTable {
    /// Get the membership of the given user
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_user(conn: &mut DbConnection, user_id: UserId) -> Result<Option<UserTable>> {
        let user_table = user_tables::table
            .filter(user_tables::user_id.eq(user_id))
            .get_result(conn)
            .optional()?;

        Ok(user_table)
    }

    /// Delete the membership of the given user and return it
    #[tracing::instrument(err, skip_all)]
    pub fn delete_for_user(conn: &mut DbConnection, user_id: UserId) -> Result<Option<UserTable>> {
        let user_table =
            diesel::delete(user_tables::table.filter(user_tables::user_id.eq(user_id)))
                .get_result(conn)
                .optional()?;

        Ok(user_table)
    }

    /// Count the members of the given table
    #[tracing::instrument(err, skip_all)]
    pub fn count_for_table(conn: &mut DbConnection, table_id: TableId) -> Result<i64> {
        let count = user_tables::table
            .filter(user_tables::table_id.eq(table_id))
            .count()
            .get_result(conn)?;

        Ok(count)
    }

    /// Get all members of the given table in the order they joined
    #[tracing::instrument(err, skip_all)]
    pub fn get_members(conn: &mut DbConnection, table_id: TableId) -> Result<Vec<Member>> {
        let members = user_tables::table
            .inner_join(users::table)
            .filter(user_tables::table_id.eq(table_id))
            .select((users::id, users::username))
            .order_by(user_tables::id)
            .load(conn)?;

        Ok(members)
    }
}

/// Diesel insertable membership struct
#[derive(Debug, Insertable)]
#[diesel(table_name = user_tables)]
pub struct NewUserTable {
    pub user_id: UserId,
    pub table_id: TableId,
}

impl NewUserTable {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<UserTable> {
        let user_table = diesel::insert_into(user_tables::table)
            .values(self)
            .get_result(conn)?;

        Ok(user_table)
    }
}
