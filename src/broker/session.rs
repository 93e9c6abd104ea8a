//! Broker session
//!
//! This module contains the session that wraps one broker connection for the
//! lifetime of a single command. It is responsible for:
//! - dialing the broker through a `BrokerClient` and tracking the session state
//! - listing, creating and deleting topics, one request/response each
//! - tailing the most recent messages of a topic until the end marker
//!
//! Usage notes:
//! - All calls are blocking and strictly sequential; the session is owned by
//!   the command that opened it and is closed when dropped.
//! - A fatal (connection) error moves the session to `Closed`; later calls
//!   fail immediately instead of touching the client again.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::broker::backend::BrokerClient;
use crate::broker::message::Message;
use crate::broker::topic::{CREATE_PARTITIONS, TAIL_PARTITION, TopicName};
use crate::config::ConnectionConfig;
use crate::utils::error::{Error, Result};

/// What a connected session is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    InFlight,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected(Activity),
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => f.write_str("disconnected"),
            SessionState::Connecting => f.write_str("connecting"),
            SessionState::Connected(Activity::Idle) => f.write_str("idle"),
            SessionState::Connected(Activity::InFlight) => f.write_str("in-flight"),
            SessionState::Closed => f.write_str("closed"),
        }
    }
}

pub struct Session<C: BrokerClient> {
    client: C,
    state: SessionState,
}

impl<C: BrokerClient> Session<C> {
    /// Dials the broker with `dial` and returns an idle session.
    ///
    /// Dial failures are returned as they are; there is no retry.
    pub fn connect<F>(config: &ConnectionConfig, dial: F) -> Result<Self>
    where
        F: FnOnce(&ConnectionConfig) -> Result<C>,
    {
        debug!(
            state = %SessionState::Connecting,
            brokers = %config.bootstrap_servers(),
            authenticated = config.credentials.is_some(),
            timeout_ms = config.dial_timeout.as_millis() as u64,
            "dialing broker"
        );
        let client = dial(config)?;

        info!(brokers = %config.bootstrap_servers(), "connected to broker");
        Ok(Self::from_client(client))
    }

    /// Wraps an already connected client.
    pub fn from_client(client: C) -> Self {
        Self {
            client,
            state: SessionState::Connected(Activity::Idle),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Deduplicated names of every topic in the cluster.
    pub fn list_topics(&mut self) -> Result<BTreeSet<String>> {
        let partitions = self.run(|client| client.fetch_partitions())?;
        debug!(partitions = partitions.len(), "partition metadata fetched");
        Ok(partitions.into_iter().map(|p| p.topic).collect())
    }

    /// Creates `topic` with a single partition.
    pub fn create_topic(&mut self, topic: &TopicName) -> Result<()> {
        self.run(|client| client.create_topic(topic, CREATE_PARTITIONS))?;
        info!(topic = %topic, partitions = CREATE_PARTITIONS, "topic created");
        Ok(())
    }

    pub fn delete_topic(&mut self, topic: &TopicName) -> Result<()> {
        self.run(|client| client.delete_topic(topic))?;
        info!(topic = %topic, "topic deleted");
        Ok(())
    }

    /// Starts a bounded tail over the last `max_messages` messages of partition 0.
    ///
    /// The returned iterator keeps the session in flight until it ends or is dropped.
    pub fn tail_topic(&mut self, topic: &TopicName, max_messages: u64) -> Result<Tail<'_, C>> {
        self.begin()?;

        let positioned = self
            .client
            .fetch_offsets(topic, TAIL_PARTITION)
            .and_then(|window| {
                let start = window.tail_start(max_messages);
                debug!(
                    topic = %topic,
                    earliest = window.earliest,
                    latest = window.latest,
                    start,
                    "offset window resolved"
                );
                self.client
                    .seek(topic, TAIL_PARTITION, start)
                    .map(|_| start)
            });

        match positioned {
            Ok(start) => Ok(Tail {
                session: self,
                topic: topic.clone(),
                start_offset: start,
                done: false,
            }),
            Err(err) => {
                self.finish(Some(&err));
                Err(err)
            }
        }
    }

    /// Releases the connection.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn run<T>(&mut self, op: impl FnOnce(&mut C) -> Result<T>) -> Result<T> {
        self.begin()?;
        let result = op(&mut self.client);
        self.finish(result.as_ref().err());
        result
    }

    fn begin(&mut self) -> Result<()> {
        match self.state {
            SessionState::Connected(Activity::Idle) => {
                self.state = SessionState::Connected(Activity::InFlight);
                Ok(())
            }
            state => Err(Error::Connection(format!("session is {state}"))),
        }
    }

    fn finish(&mut self, err: Option<&Error>) {
        match err {
            Some(err) if err.is_fatal() => {
                warn!(error = %err, "fatal broker error, closing session");
                self.shutdown();
            }
            _ => self.state = SessionState::Connected(Activity::Idle),
        }
    }

    fn shutdown(&mut self) {
        if self.state != SessionState::Closed {
            self.client.close();
            self.state = SessionState::Closed;
            debug!(state = %self.state, "session released");
        }
    }
}

impl<C: BrokerClient> Drop for Session<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Lazy sequence of tailed messages.
///
/// Ends after the first empty-payload message (which is not yielded) or after
/// the first error (which is).
pub struct Tail<'a, C: BrokerClient> {
    session: &'a mut Session<C>,
    topic: TopicName,
    start_offset: i64,
    done: bool,
}

impl<C: BrokerClient> Tail<'_, C> {
    pub fn start_offset(&self) -> i64 {
        self.start_offset
    }
}

impl<C: BrokerClient> Iterator for Tail<'_, C> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.session.client.next_message() {
            Ok(msg) if msg.is_end_marker() => {
                debug!(topic = %self.topic, offset = msg.offset, "end of tail");
                self.done = true;
                self.session.finish(None);
                None
            }
            Ok(msg) => {
                debug!(
                    topic = %self.topic,
                    offset = msg.offset,
                    bytes = msg.payload.len(),
                    timestamp = ?msg.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis),
                    "message read"
                );
                Some(Ok(msg))
            }
            Err(err) => {
                self.done = true;
                self.session.finish(Some(&err));
                Some(Err(err))
            }
        }
    }
}

impl<C: BrokerClient> Drop for Tail<'_, C> {
    fn drop(&mut self) {
        if self.session.state == SessionState::Connected(Activity::InFlight) {
            self.session.state = SessionState::Connected(Activity::Idle);
        }
    }
}
