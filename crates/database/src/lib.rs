// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Receipt tables database connector, interface and connection handling

use diesel::r2d2::ConnectionManager;
use diesel::result::{DatabaseErrorKind, Error};
use diesel::{r2d2, PgConnection};

mod db;

pub use db::Db;

/// Pooled connection alias
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Result type using [`DatabaseError`] as a default Error
pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

/// Error types for the database abstraction
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database Error: `{0}`")]
    Custom(String),
    #[error("Diesel Error: `{0}`")]
    DieselError(diesel::result::Error),
    #[error("A requested resource could not be found")]
    NotFound,
    // The R2D2 error mapping is only possible when using r2d2 directly as a dependency, hence the
    // generic R2D2 error handling. See https://github.com/diesel-rs/diesel/issues/2336
    #[error("The connection pool returned an Error: `{0}`")]
    R2D2Error(String),
}

impl DatabaseError {
    pub fn custom<T: ToString>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Returns the name of the violated constraint if this error is a unique violation
    pub fn unique_violation(&self) -> Option<&str> {
        self.constraint_violation(DatabaseErrorKind::UniqueViolation)
    }

    /// Returns the name of the violated constraint if this error is a foreign key violation
    pub fn foreign_key_violation(&self) -> Option<&str> {
        self.constraint_violation(DatabaseErrorKind::ForeignKeyViolation)
    }

    fn constraint_violation(&self, expected: DatabaseErrorKind) -> Option<&str> {
        match self {
            Self::DieselError(Error::DatabaseError(kind, info))
                if std::mem::discriminant(kind) == std::mem::discriminant(&expected) =>
            {
                Some(info.constraint_name().unwrap_or_default())
            }
            _ => None,
        }
    }
}

pub trait OptionalExt<T, E> {
    fn optional(self) -> Result<Option<T>, E>;
}

impl<T> OptionalExt<T, DatabaseError> for Result<T, DatabaseError> {
    fn optional(self) -> Result<Option<T>, DatabaseError> {
        match self {
            Ok(t) => Ok(Some(t)),
            Err(DatabaseError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl From<diesel::result::Error> for DatabaseError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            Error::NotFound => Self::NotFound,
            err => DatabaseError::DieselError(err),
        }
    }
}
