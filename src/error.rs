use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    response::ApiResponse,
    validation::ModelError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// A stored row no longer satisfies the record invariants: that is our
    /// fault, not the caller's.
    pub fn corrupt_row(err: ModelError) -> Self {
        AppError::Internal(anyhow::Error::new(err).context("stored row failed validation"))
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Model(_) => StatusCode::BAD_REQUEST,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let field = match &self {
            AppError::Model(err) => err.field(),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else if let AppError::Model(err) = &self {
            tracing::debug!(field, error = %err, "payload rejected");
        }

        let body = ApiResponse::failure(
            self.to_string(),
            ErrorData {
                error: self.to_string(),
                field,
            },
        );

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
