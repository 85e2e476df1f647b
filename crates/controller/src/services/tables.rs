// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Lifecycle of tables and the memberships of users in them
//!
//! A table is created together with the membership of its creator and deleted together
//! with the membership of its last member.
use super::{map_table_fkey, passphrase, TableError};
use database::DbConnection;
use db_storage::tables::{Member, NewTable, NewUserTable, Table, TableKey, UserTable};
use db_storage::users::User;
use diesel::Connection;

/// Create a new table with a random key and make `user` its first member
///
/// Returns the key other users can join the table with.
#[tracing::instrument(err, skip_all, fields(user_id = %user.id))]
pub fn create_table(
    conn: &mut DbConnection,
    user: &User,
    max_key_attempts: u32,
) -> Result<TableKey, TableError> {
    if UserTable::get_for_user(conn, user.id)?.is_some() {
        return Err(TableError::UserAlreadyInTable);
    }

    let table_key =
        passphrase::generate_unique_key(max_key_attempts, |key| Table::key_exists(conn, key))?;

    conn.transaction::<_, TableError, _>(|conn| {
        let table = NewTable::new(&table_key).insert(conn)?;

        NewUserTable {
            user_id: user.id,
            table_id: table.id,
        }
        .insert(conn)?;

        log::info!("User {} created table {}", user.id, table.id);

        Ok(table.table_key)
    })
}

/// List the members of the table `user` is a member of, in the order they joined
#[tracing::instrument(err, skip_all, fields(user_id = %user.id))]
pub fn list_members(conn: &mut DbConnection, user: &User) -> Result<Vec<Member>, TableError> {
    conn.transaction::<_, TableError, _>(|conn| {
        let membership =
            UserTable::get_for_user(conn, user.id)?.ok_or(TableError::NotInAnyTable)?;

        // waits for a concurrent leave, which may have removed the membership meanwhile
        if Table::get_for_share(conn, membership.table_id)?.is_none() {
            return Err(TableError::NotInAnyTable);
        }

        let members = UserTable::get_members(conn, membership.table_id)?;

        if !members.iter().any(|member| member.user_id == user.id) {
            return Err(TableError::NotInAnyTable);
        }

        Ok(members)
    })
}

/// Add `user` to the table with the given key
#[tracing::instrument(err, skip_all, fields(user_id = %user.id))]
pub fn join_table(
    conn: &mut DbConnection,
    user: &User,
    table_key: &TableKey,
) -> Result<UserTable, TableError> {
    conn.transaction::<_, TableError, _>(|conn| {
        if UserTable::get_for_user(conn, user.id)?.is_some() {
            return Err(TableError::UserAlreadyInTable);
        }

        // keys with NUL can not be stored, so no table has one
        if table_key.inner().contains('\0') {
            return Err(TableError::TableNotFound);
        }

        // the lock keeps the last member from deleting the table until we are done
        let table =
            Table::get_by_key_for_share(conn, table_key)?.ok_or(TableError::TableNotFound)?;

        let membership = NewUserTable {
            user_id: user.id,
            table_id: table.id,
        }
        .insert(conn)
        .map_err(|e| map_table_fkey(e, TableError::TableNotFound))?;

        log::info!("User {} joined table {}", user.id, table.id);

        Ok(membership)
    })
}

/// Remove `user` from their table and delete the table if it has no members left
///
/// Returns the removed membership.
#[tracing::instrument(err, skip_all, fields(user_id = %user.id))]
pub fn leave_table(conn: &mut DbConnection, user: &User) -> Result<UserTable, TableError> {
    conn.transaction::<_, TableError, _>(|conn| {
        let membership =
            UserTable::get_for_user(conn, user.id)?.ok_or(TableError::NotInAnyTable)?;

        // blocks joins to this table until the member count has been checked
        if Table::get_for_update(conn, membership.table_id)?.is_none() {
            return Err(TableError::TableInconsistent);
        }

        let removed =
            UserTable::delete_for_user(conn, user.id)?.ok_or(TableError::NotInAnyTable)?;

        if removed.table_id != membership.table_id {
            return Err(TableError::TableInconsistent);
        }

        if UserTable::count_for_table(conn, removed.table_id)? == 0 {
            Table::delete_by_id(conn, removed.table_id)
                .map_err(|e| map_table_fkey(e, TableError::TableInconsistent))?;

            log::info!(
                "User {} left table {} as last member, deleted the table",
                user.id,
                removed.table_id
            );
        } else {
            log::info!("User {} left table {}", user.id, removed.table_id);
        }

        Ok(removed)
    })
}
