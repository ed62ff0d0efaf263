use std::io;
use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_core::error::{
    DUPLICATE_EMAIL_MESSAGE, DUPLICATE_RECORD_MESSAGE, INTERNAL_MESSAGE, NOT_FOUND_MESSAGE,
};
use roster_core::{ErrorKind, MessageDto, ValidationError};
use roster_store::error::StoreError;
use thiserror::Error;
use tracing::{debug, error};

pub const MALFORMED_BODY_MESSAGE: &str = "malformed request body";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found";

/// Failure of a single request. Everything except `Internal` is shown to the
/// caller verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("malformed request body")]
    MalformedBody,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => ErrorKind::Validation,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => ApiError::Validation(err),
            StoreError::DuplicateRecord => ApiError::Conflict(DUPLICATE_RECORD_MESSAGE),
            StoreError::DuplicateEmail(_) => ApiError::Conflict(DUPLICATE_EMAIL_MESSAGE),
            StoreError::NotFound(_) => ApiError::NotFound(NOT_FOUND_MESSAGE),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected request body");
        ApiError::MalformedBody
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "request failed");
        }
        let status = self.status();
        (status, Json(MessageDto::new(self.public_message()))).into_response()
    }
}

/// Fallback for any method and path pair no route claims.
pub async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageDto::new(ROUTE_NOT_FOUND_MESSAGE)),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("invalid allowed origin: {0}")]
    InvalidOrigin(String),
    #[error("server io error: {0}")]
    Io(#[from] io::Error),
}
