//! In-memory `BrokerClient` used by the unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::broker::backend::BrokerClient;
use crate::broker::message::Message;
use crate::broker::offset::OffsetWindow;
use crate::broker::topic::{PartitionDescriptor, TopicName};
use crate::utils::error::{Error, Result};

/// A request as the fake broker received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchPartitions,
    CreateTopic { topic: String, partitions: i32 },
    DeleteTopic { topic: String },
    FetchOffsets { topic: String, partition: i32 },
    Seek { topic: String, partition: i32, offset: i64 },
    NextMessage,
    Close,
}

#[derive(Debug, Default)]
pub struct FakeLog {
    /// Topic name -> partition logs, each with its earliest retained offset.
    pub topics: BTreeMap<String, Vec<(i64, Vec<Vec<u8>>)>>,
    pub requests: Vec<Request>,
    /// Offset at which `next_message` fails with a connection error.
    pub fail_at: Option<i64>,
    cursor: Option<(String, i32, i64)>,
}

/// Cloneable handle; clones share the same log so tests can inspect it after
/// the client moved into a session.
#[derive(Debug, Clone, Default)]
pub struct FakeBroker {
    log: Arc<Mutex<FakeLog>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a topic whose partition 0 holds `payloads` starting at `earliest`.
    pub fn with_topic(self, name: &str, earliest: i64, payloads: &[&str]) -> Self {
        self.with_partitions(name, vec![(earliest, payloads.to_vec())])
    }

    pub fn with_partitions(self, name: &str, partitions: Vec<(i64, Vec<&str>)>) -> Self {
        let logs = partitions
            .into_iter()
            .map(|(earliest, payloads)| {
                let payloads = payloads.iter().map(|p| p.as_bytes().to_vec()).collect();
                (earliest, payloads)
            })
            .collect();
        self.log.lock().unwrap().topics.insert(name.to_string(), logs);
        self
    }

    pub fn failing_at(self, offset: i64) -> Self {
        self.log.lock().unwrap().fail_at = Some(offset);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().requests.clone()
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.log.lock().unwrap().topics.keys().cloned().collect()
    }
}

impl BrokerClient for FakeBroker {
    fn fetch_partitions(&mut self) -> Result<Vec<PartitionDescriptor>> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(Request::FetchPartitions);
        Ok(log
            .topics
            .iter()
            .flat_map(|(name, parts)| {
                (0..parts.len()).map(move |p| PartitionDescriptor::new(name, p as i32))
            })
            .collect())
    }

    fn create_topic(&mut self, topic: &TopicName, partitions: i32) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(Request::CreateTopic {
            topic: topic.to_string(),
            partitions,
        });
        if log.topics.contains_key(topic.as_str()) {
            return Err(Error::Broker(format!("topic '{topic}' already exists")));
        }
        let logs = (0..partitions).map(|_| (0, Vec::new())).collect();
        log.topics.insert(topic.to_string(), logs);
        Ok(())
    }

    fn delete_topic(&mut self, topic: &TopicName) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(Request::DeleteTopic {
            topic: topic.to_string(),
        });
        match log.topics.remove(topic.as_str()) {
            Some(_) => Ok(()),
            None => Err(Error::Broker(format!("unknown topic '{topic}'"))),
        }
    }

    fn fetch_offsets(&mut self, topic: &TopicName, partition: i32) -> Result<OffsetWindow> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(Request::FetchOffsets {
            topic: topic.to_string(),
            partition,
        });
        let (earliest, payloads) = log
            .topics
            .get(topic.as_str())
            .and_then(|parts| parts.get(partition as usize))
            .ok_or_else(|| Error::Broker(format!("unknown topic or partition '{topic}'")))?;
        Ok(OffsetWindow::new(*earliest, earliest + payloads.len() as i64))
    }

    fn seek(&mut self, topic: &TopicName, partition: i32, offset: i64) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(Request::Seek {
            topic: topic.to_string(),
            partition,
            offset,
        });
        log.cursor = Some((topic.to_string(), partition, offset));
        Ok(())
    }

    fn next_message(&mut self) -> Result<Message> {
        let mut log = self.log.lock().unwrap();
        log.requests.push(Request::NextMessage);
        let (topic, partition, offset) = log
            .cursor
            .clone()
            .ok_or_else(|| Error::Broker("no partition assigned".to_string()))?;
        if log.fail_at == Some(offset) {
            return Err(Error::Connection("broker went away".to_string()));
        }
        let (earliest, payloads) = &log.topics[&topic][partition as usize];
        let payload = usize::try_from(offset - earliest)
            .ok()
            .and_then(|i| payloads.get(i))
            .cloned()
            .unwrap_or_default();
        log.cursor = Some((topic, partition, offset + 1));
        Ok(Message::new(offset, payload))
    }

    fn close(&mut self) {
        self.log.lock().unwrap().requests.push(Request::Close);
    }
}
