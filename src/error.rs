use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Generation backend error (HTTP {status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("Could not parse JSON from model output")]
    UnparsableOutput,
}

impl Error {
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Error::BackendUnavailable(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            return Error::BackendUnavailable(err.to_string());
        }
        match err.status() {
            Some(status) => Error::BackendError {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Error::BackendError {
                status: 0,
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match &self {
            Error::BackendUnavailable(_) | Error::BackendError { .. } => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", self),
            ),
            Error::UnparsableOutput | Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
