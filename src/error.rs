use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug)]
pub enum AppError {
    Database(String),
    Hash(String),
}

/// Terminal fallback for failures a handler cannot turn into a redirect.
/// Store and hash detail stays in the logs, never in the body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "database error");
            }
            AppError::Hash(msg) => {
                tracing::error!(error = %msg, "password hashing error");
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
