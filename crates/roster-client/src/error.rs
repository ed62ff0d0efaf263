use reqwest::StatusCode;
use roster_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response, rebuilt from the status and the `message` body.
    #[error("{message}")]
    Api {
        kind: ErrorKind,
        status: u16,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Api { kind, .. } => *kind,
            ClientError::InvalidUrl(_) | ClientError::Http(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        ClientError::Api {
            kind: kind_for_status(status),
            status: status.as_u16(),
            message,
        }
    }
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::Internal,
    }
}
