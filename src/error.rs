use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

/// Every failure a request can end in. Rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    BadCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Absent and owned-by-someone-else are deliberately the same error.
    #[error("{0} not found or unauthorized")]
    NotFoundOrUnauthorized(&'static str),

    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: StoreError,
    },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn persistence(message: impl Into<String>, source: StoreError) -> Self {
        AppError::Persistence {
            message: message.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateEmail
            | AppError::UserNotFound
            | AppError::BadCredentials => StatusCode::BAD_REQUEST,
            AppError::MissingToken | AppError::InvalidToken | AppError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFoundOrUnauthorized(_) => StatusCode::NOT_FOUND,
            AppError::Persistence { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Persistence { message, source } => {
                error!(error = %source, %message, "storage failure");
            }
            AppError::Internal(e) => error!(error = ?e, "internal error"),
            _ => {}
        }

        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
