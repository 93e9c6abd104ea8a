//! The `error` module defines the error type shared by every part of `kafkacli`.
//!
//! Errors are never recovered locally: each one aborts the running command and
//! is reported once by the top-level handler in `main`.

use thiserror::Error;

/// All failures a command can end with.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Dial, authentication or transport failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Input rejected before any broker round trip.
    #[error("{0}")]
    Validation(String),

    /// The broker refused or failed a request.
    #[error("broker error: {0}")]
    Broker(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Fatal errors leave the broker session unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(format!("invalid settings file: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
