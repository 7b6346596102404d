//! Settings service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error("shipping method not found")]
    NotFound,

    #[error("tax percent must be between 0 and 100")]
    InvalidTaxPercent,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SettingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation | ErrorKind::Other | _,
            )
            | None => Self::Sql(error),
        }
    }
}
