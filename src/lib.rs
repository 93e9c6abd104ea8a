//! # kafkacli
//!
//! `kafkacli` is a small command-line tool for administering a Kafka cluster:
//! listing, creating and deleting topics, and tailing the most recent messages
//! of a topic.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: The broker session: connection state, topic operations and the bounded tail.
//! - `client`: The `rdkafka` backed client the session talks to.
//! - `commands`: Command definitions and the dispatcher that runs them.
//! - `config`: Loads the settings file and resolves the connection configuration.
//! - `persistence`: Reads and updates the settings file for `connection get`/`set`.
//! - `utils`: Shared utilities, such as error handling and logging.

pub mod broker;
pub mod client;
pub mod commands;
pub mod config;
pub mod persistence;
pub mod utils;
