use sqlx::error::ErrorKind;

use crate::application::repos::RepoError;

/// Postgres `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";
/// Postgres `invalid_text_representation`, e.g. a malformed uuid literal.
const INVALID_TEXT: &str = "22P02";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    let db = match err {
        sqlx::Error::RowNotFound => return RepoError::NotFound,
        sqlx::Error::Database(db) => db,
        other => return RepoError::from_persistence(other),
    };

    match (db.kind(), db.code().as_deref()) {
        (ErrorKind::UniqueViolation, _) => RepoError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        (ErrorKind::ForeignKeyViolation, _) | (_, Some(INVALID_TEXT)) => RepoError::InvalidInput {
            message: db.message().to_string(),
        },
        (ErrorKind::NotNullViolation | ErrorKind::CheckViolation, _) => RepoError::Integrity {
            message: db.message().to_string(),
        },
        (_, Some(QUERY_CANCELED)) => RepoError::Timeout,
        _ => RepoError::from_persistence(db.message()),
    }
}
