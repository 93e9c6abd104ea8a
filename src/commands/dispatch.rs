use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::broker::{BrokerClient, Session};
use crate::commands::{Command, ConnectionCommand, TopicOp};
use crate::config::{ConnectionConfig, load_config};
use crate::persistence::SettingsStore;
use crate::utils::error::Result;

/// Runs commands against the settings file and, for topic commands, a broker
/// session opened with `dial`.
pub struct Dispatcher<D> {
    store: SettingsStore,
    dial: D,
}

impl<D, C> Dispatcher<D>
where
    D: Fn(&ConnectionConfig) -> Result<C>,
    C: BrokerClient,
{
    pub fn new(settings_path: impl Into<PathBuf>, dial: D) -> Self {
        Self {
            store: SettingsStore::new(settings_path),
            dial,
        }
    }

    /// Runs `command`, writing its output lines to `out`.
    pub fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Topic(cmd) => {
                let op = TopicOp::try_from(cmd)?;
                self.run_topic(op, out)
            }
            Command::Connection(cmd) => self.run_connection(cmd, out),
        }
    }

    fn run_topic<W: Write>(&self, op: TopicOp, out: &mut W) -> Result<()> {
        let settings = load_config(self.store.path())?;
        let config = ConnectionConfig::try_from(&settings)?;
        debug!(?op, "running topic command");

        // dropped on every return path, which releases the connection
        let mut session = Session::connect(&config, &self.dial)?;

        match op {
            TopicOp::List => {
                for name in session.list_topics()? {
                    writeln!(out, "{name}")?;
                }
            }
            TopicOp::Create(name) => {
                session.create_topic(&name)?;
                writeln!(out, "topic created")?;
            }
            TopicOp::Delete(name) => {
                session.delete_topic(&name)?;
                writeln!(out, "topic deleted")?;
            }
            TopicOp::Tail(name) => {
                let mut count = 0_u64;
                for message in session.tail_topic(&name, config.max_messages)? {
                    writeln!(out, "{}", message?.payload_str())?;
                    count += 1;
                }
                info!(topic = %name, count, "tail finished");
            }
        }

        session.close();
        Ok(())
    }

    fn run_connection<W: Write>(&self, cmd: ConnectionCommand, out: &mut W) -> Result<()> {
        match cmd {
            ConnectionCommand::Get => {
                let raw = self.store.read_raw()?;
                writeln!(out, "{raw}")?;
            }
            ConnectionCommand::Set { key, value } => self.store.set(key, &value)?,
        }
        Ok(())
    }
}
