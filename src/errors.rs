use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data or account-invariant violation
    #[error("{message}")]
    BadRequest { message: String },

    /// A collaborator failed unexpectedly; detail is logged, never returned
    #[error("failed to {operation}")]
    Internal { operation: String },

    /// Deliberately absent capability, permanent
    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    /// Storage backend error, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Conflict { .. } => StatusCode::CONFLICT,
                StoreError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::NotImplemented { operation } => format!("{operation} is not implemented"),
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => "Account not found".to_string(),
                StoreError::Conflict { name } => {
                    format!("An account named {name} already exists")
                }
                StoreError::Other(_) => "Storage error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Store(StoreError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Store(StoreError::Conflict { .. }) => {
                tracing::warn!("Storage conflict: {}", self);
            }
            Error::BadRequest { .. } | Error::Store(StoreError::NotFound) => {
                tracing::debug!("Client error: {}", self);
            }
            Error::NotImplemented { .. } => {
                tracing::debug!("Unimplemented capability requested: {}", self);
            }
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
