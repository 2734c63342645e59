use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use items_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body could not be decoded as JSON.
    #[error("{0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Returns `true` when the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Store(err) => err.is_client_error(),
            Self::BadRequest(_) => true,
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::Validation(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Client errors carry their message; server errors are logged and answered
/// with a generic body.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_client_error() {
            return (status, self.to_string()).into_response();
        }

        tracing::error!(error = %self, "request failed");
        let body = match self {
            Self::Store(StoreError::StorageRead(_)) => "failed to read items",
            Self::Store(StoreError::StorageWrite(_)) => "failed to save items",
            _ => "internal server error",
        };
        (status, body).into_response()
    }
}
