use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

// SQLite extended result codes and PostgreSQL SQLSTATEs
const SQLITE_UNIQUE: &str = "2067";
const SQLITE_PRIMARY_KEY: &str = "1555";
const SQLITE_FOREIGN_KEY: &str = "787";
const PG_UNIQUE: &str = "23505";
const PG_FOREIGN_KEY: &str = "23503";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                let code = e.as_database_error()
                    .and_then(|db_err| db_err.code())
                    .unwrap_or_default();

                match code.as_ref() {
                    SQLITE_UNIQUE | SQLITE_PRIMARY_KEY | PG_UNIQUE => {
                        warn!("Unique constraint violated: {}", e);
                        (StatusCode::CONFLICT, "Resource already exists (duplicate entry)".to_string())
                    }
                    SQLITE_FOREIGN_KEY | PG_FOREIGN_KEY => {
                        warn!("Foreign key constraint violated: {}", e);
                        (StatusCode::CONFLICT, "Resource is still referenced by other records".to_string())
                    }
                    _ => {
                        error!("Database error: {:?}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                    }
                }
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
