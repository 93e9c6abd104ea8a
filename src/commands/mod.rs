//! The `commands` module defines what a user can ask `kafkacli` to do and
//! runs it.
//!
//! Commands are parsed into tagged enums with `clap`; topic commands are then
//! validated into a `TopicOp` before any settings are read or any broker is
//! dialed.

pub mod dispatch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::broker::topic::TopicName;
use crate::config::{DEFAULT_SETTINGS_FILE, SettingKey};
use crate::utils::error::Error;

pub use dispatch::Dispatcher;

/// A simple Kafka CLI program to manage your kafka.
#[derive(Debug, Parser)]
#[command(name = "kafkacli")]
#[command(version)]
#[command(about = "A simple Kafka CLI program to manage your kafka")]
pub struct Cli {
    /// Path to the settings file
    #[arg(long, global = true, env = "KAFKACLI_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "KAFKACLI_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Topic commands
    #[command(subcommand)]
    Topic(TopicCommand),

    /// Read or change the settings file
    #[command(subcommand)]
    Connection(ConnectionCommand),
}

#[derive(Debug, Subcommand)]
pub enum TopicCommand {
    /// List all topics in the cluster
    #[command(visible_alias = "l")]
    List,

    /// Create a topic with a single partition
    #[command(visible_alias = "c")]
    Create { name: String },

    /// Delete a topic
    #[command(visible_alias = "d")]
    Delete { name: String },

    /// Print the most recent messages of a topic (MaxMessages of them)
    #[command(visible_alias = "r")]
    Read { name: String },
}

#[derive(Debug, Subcommand)]
pub enum ConnectionCommand {
    /// Print the settings file as stored
    Get,

    /// Change one setting and save the file
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: String,
    },
}

/// A validated topic operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicOp {
    List,
    Create(TopicName),
    Delete(TopicName),
    Tail(TopicName),
}

impl TryFrom<TopicCommand> for TopicOp {
    type Error = Error;

    fn try_from(cmd: TopicCommand) -> Result<Self, Self::Error> {
        Ok(match cmd {
            TopicCommand::List => TopicOp::List,
            TopicCommand::Create { name } => TopicOp::Create(TopicName::new(name)?),
            TopicCommand::Delete { name } => TopicOp::Delete(TopicName::new(name)?),
            TopicCommand::Read { name } => TopicOp::Tail(TopicName::new(name)?),
        })
    }
}
