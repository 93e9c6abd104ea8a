use crate::broker::message::Message;
use crate::broker::offset::OffsetWindow;
use crate::broker::topic::{PartitionDescriptor, TopicName};
use crate::utils::error::Result;

/// The request/response surface a broker session drives.
///
/// Every call blocks until the broker answers. Implementations map their own
/// failures to `Error::Connection` (transport) or `Error::Broker` (rejection).
pub trait BrokerClient {
    /// Partition metadata for the whole cluster.
    fn fetch_partitions(&mut self) -> Result<Vec<PartitionDescriptor>>;

    fn create_topic(&mut self, topic: &TopicName, partitions: i32) -> Result<()>;

    fn delete_topic(&mut self, topic: &TopicName) -> Result<()>;

    fn fetch_offsets(&mut self, topic: &TopicName, partition: i32) -> Result<OffsetWindow>;

    /// Positions the reader so the next message returned is at `offset`.
    fn seek(&mut self, topic: &TopicName, partition: i32, offset: i64) -> Result<()>;

    /// Blocks until the next message is available.
    ///
    /// Past the end of the log this yields a message with an empty payload.
    fn next_message(&mut self) -> Result<Message>;

    /// Releases the connection. Called once when the session closes.
    fn close(&mut self) {}
}
