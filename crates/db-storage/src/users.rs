// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the user specific database structs and queries
use super::schema::users;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;

pub use types::core::UserId;

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user column
#[derive(Clone, Queryable, Identifiable)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl User {
    /// Get a user with the given id
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        let user = users::table.filter(users::id.eq(user_id)).get_result(conn)?;

        Ok(user)
    }

    /// Get a user by the name they authenticate with
    ///
    /// Returns `Ok(None)` when no user with that name exists
    #[tracing::instrument(err, skip_all, fields(%username))]
    pub fn get_by_username(conn: &mut DbConnection, username: &str) -> Result<Option<User>> {
        let user = users::table
            .filter(users::username.eq(username))
            .get_result(conn)
            .optional()?;

        Ok(user)
    }

    /// Get all users ordered by their id
    #[tracing::instrument(err, skip_all)]
    pub fn get_all(conn: &mut DbConnection) -> Result<Vec<User>> {
        let users = users::table.order_by(users::id).load(conn)?;

        Ok(users)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

impl NewUser<'_> {
    #[tracing::instrument(err, skip_all, fields(username = %self.username))]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        let user = diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)?;

        Ok(user)
    }
}
