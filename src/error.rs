//! Crate-wide error type. Callers that sit in front of the models (a web
//! handler, the CLI) can map every failure to a status with [`LunchlyError::status`].

use thiserror::Error;

use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum LunchlyError {
    /// No row matched the requested identifier.
    #[error("No such {entity}: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LunchlyError {
    pub(crate) fn customer_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "customer",
            id,
        }
    }

    pub(crate) fn reservation_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "reservation",
            id,
        }
    }

    /// HTTP-style status for the failure: 404 for missing rows, 400 for bad
    /// input, 500 for everything the store or environment threw at us.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Storage(_) | Self::Io(_) | Self::Config(_) => 500,
        }
    }

    /// True for a missing row, whatever the entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, LunchlyError>;
