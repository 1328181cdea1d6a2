//! Error handling for rowmap-store
//!
//! Driver failures are carried as `OrmError::Driver` with the rusqlite error
//! kept as the source, so callers can still branch on SQLite error codes.

use rowmap_core::errors::OrmError;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

/// Wrap a rusqlite error raised during `op`
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> OrmError {
    OrmError::driver(op, err)
}

/// The rusqlite error behind a driver failure, if any
pub fn as_rusqlite(err: &OrmError) -> Option<&rusqlite::Error> {
    err.driver_source()?.downcast_ref::<rusqlite::Error>()
}

/// Whether the driver rejected the statement on a constraint
/// (UNIQUE, NOT NULL, FOREIGN KEY, CHECK)
pub fn is_constraint_violation(err: &OrmError) -> bool {
    matches!(
        as_rusqlite(err),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
