use std::fmt;

use crate::utils::error::Error;

/// Partition every tail reads from.
pub const TAIL_PARTITION: i32 = 0;

/// Partition count used when creating a topic.
pub const CREATE_PARTITIONS: i32 = 1;

/// A topic name that has been checked before reaching the broker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicName(String);

impl TopicName {
    /// Rejects empty (or blank) names with a validation error.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::Validation(
                "topic name cannot be empty or null!".to_string(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One partition of one topic, as reported by cluster metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionDescriptor {
    pub topic: String,
    pub partition: i32,
}

impl PartitionDescriptor {
    pub fn new(topic: &str, partition: i32) -> Self {
        Self {
            topic: topic.to_string(),
            partition,
        }
    }
}
