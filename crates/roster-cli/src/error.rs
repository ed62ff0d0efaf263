use anyhow::Error;
use roster_client::ClientError;
use roster_config::ConfigError;
use roster_core::{ErrorKind, ValidationError};
use roster_server::ServerError;
use roster_store::error::StoreError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_CONFLICT: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn conflict(message: impl Into<String>) -> Error {
    CliError::Conflict(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
                CliError::Conflict(_) => EXIT_CONFLICT,
            });
        }
        if cause.downcast_ref::<ValidationError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(client_err) = cause.downcast_ref::<ClientError>() {
            return ExitCode::from(kind_exit_code(client_err.kind()));
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(kind_exit_code(store_err.kind()));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if cause.downcast_ref::<ServerError>().is_some() {
            return ExitCode::from(EXIT_FAILURE);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn kind_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Validation => EXIT_INVALID_INPUT,
        ErrorKind::NotFound => EXIT_NOT_FOUND,
        ErrorKind::Conflict => EXIT_CONFLICT,
        ErrorKind::Internal => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir | ConfigError::Read { .. } => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidBind(_)
        | ConfigError::InvalidOrigin(_)
        | ConfigError::EmptyOrigins
        | ConfigError::InvalidDbPath
        | ConfigError::InvalidApiUrl(_)
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
