//! The `utils` module provides the pieces shared across `kafkacli`:
//! the crate error type and logging setup.

pub mod error;
pub mod logging;
