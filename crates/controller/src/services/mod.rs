// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Table and membership operations that hide the database details from the endpoints
//!
//! Every operation takes the requesting user explicitly and runs its queries on the
//! connection it is handed, multi step mutations inside a single transaction.
use database::DatabaseError;
use db_storage::constraints;

pub mod passphrase;
pub mod tables;

/// Errors of the table and membership operations
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("A table with the generated key already exists")]
    TableAlreadyExists,
    #[error("Could not generate an unused table key within {0} attempts")]
    KeyGenerationExhausted(u32),
    #[error("The user already is a member of a table")]
    UserAlreadyInTable,
    #[error("The user is not a member of any table")]
    NotInAnyTable,
    #[error("No table with the given key exists")]
    TableNotFound,
    #[error("The table changed while it was being left")]
    TableInconsistent,
    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for TableError {
    fn from(err: DatabaseError) -> Self {
        match err.unique_violation() {
            Some(constraints::TABLE_KEY_UNIQUE) => Self::TableAlreadyExists,
            Some(constraints::USER_TABLE_USER_UNIQUE) => Self::UserAlreadyInTable,
            _ => Self::Database(err),
        }
    }
}

impl From<diesel::result::Error> for TableError {
    fn from(err: diesel::result::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

/// Map a foreign key violation on `user_tables.table_id` to `on_violation`
fn map_table_fkey(err: DatabaseError, on_violation: TableError) -> TableError {
    if err.foreign_key_violation() == Some(constraints::USER_TABLE_TABLE_FKEY) {
        on_violation
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error};

    #[derive(Debug)]
    struct Constraint(&'static str);

    impl DatabaseErrorInformation for Constraint {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn violation(kind: DatabaseErrorKind, constraint: &'static str) -> DatabaseError {
        Error::DatabaseError(kind, Box::new(Constraint(constraint))).into()
    }

    #[test]
    fn unique_violations_map_to_conflicts() {
        assert!(matches!(
            TableError::from(violation(
                DatabaseErrorKind::UniqueViolation,
                "tables_table_key_key"
            )),
            TableError::TableAlreadyExists
        ));
        assert!(matches!(
            TableError::from(violation(
                DatabaseErrorKind::UniqueViolation,
                "user_tables_user_id_key"
            )),
            TableError::UserAlreadyInTable
        ));
        assert!(matches!(
            TableError::from(violation(
                DatabaseErrorKind::UniqueViolation,
                "users_username_key"
            )),
            TableError::Database(_)
        ));
    }

    #[test]
    fn foreign_key_violations_depend_on_the_operation() {
        let err = violation(
            DatabaseErrorKind::ForeignKeyViolation,
            "user_tables_table_id_fkey",
        );
        assert!(matches!(
            map_table_fkey(err, TableError::TableNotFound),
            TableError::TableNotFound
        ));

        let err = violation(
            DatabaseErrorKind::ForeignKeyViolation,
            "user_tables_user_id_fkey",
        );
        assert!(matches!(
            map_table_fkey(err, TableError::TableInconsistent),
            TableError::Database(_)
        ));

        assert!(matches!(
            TableError::from(Error::NotFound),
            TableError::Database(DatabaseError::NotFound)
        ));
    }
}
