use roster_core::{ErrorKind, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid id string: {0}")]
    InvalidId(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),
    #[error("duplicate record")]
    DuplicateRecord,
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::DuplicateEmail(_) | StoreError::DuplicateRecord => ErrorKind::Conflict,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Io(_)
            | StoreError::Sql(_)
            | StoreError::MissingHomeDir
            | StoreError::InvalidId(_)
            | StoreError::Migration(_)
            | StoreError::InvalidDataPath(_) => ErrorKind::Internal,
        }
    }
}
