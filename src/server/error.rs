use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

use crate::config::ConfigError;
use crate::share::ResolveError;

/// Errors a request handler can end with.
///
/// Bodies are plain text and deliberately uninformative: a rejected path, a
/// missing file and a directory all produce the same 404.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Image not found")]
    NotFound,
    #[error("Server error")]
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::NotFound => (StatusCode::NOT_FOUND, "Image not found").into_response(),
            HttpError::Internal(detail) => {
                error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

impl From<ResolveError> for HttpError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => HttpError::NotFound,
        }
    }
}

impl From<JoinError> for HttpError {
    fn from(err: JoinError) -> Self {
        HttpError::Internal(format!("blocking task failed: {err}"))
    }
}

/// Startup failures of the HTTP server.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
