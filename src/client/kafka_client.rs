use std::time::Duration;

use futures::executor::block_on;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message as _;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::util::Timeout;
use rdkafka::{Offset, TopicPartitionList};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broker::backend::BrokerClient;
use crate::broker::message::Message;
use crate::broker::offset::OffsetWindow;
use crate::broker::topic::{PartitionDescriptor, TopicName};
use crate::config::ConnectionConfig;
use crate::utils::error::{Error, Result};

/// Replication factor for created topics.
const REPLICATION_FACTOR: i32 = 1;

/// Client settings shared by the consumer and the admin client.
///
/// SASL-PLAIN is negotiated only when credentials are configured.
pub fn admin_config(config: &ConnectionConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", config.bootstrap_servers())
        .set("client.id", "kafkacli")
        .set(
            "socket.connection.setup.timeout.ms",
            config.dial_timeout.as_millis().to_string(),
        );

    if let Some(credentials) = &config.credentials {
        client_config
            .set("security.protocol", "sasl_plaintext")
            .set("sasl.mechanism", "PLAIN")
            .set("sasl.username", &credentials.username)
            .set("sasl.password", &credentials.password);
    }
    client_config
}

/// Settings for the tailing consumer.
///
/// Partitions are assigned by hand and offsets are never committed; the group
/// id only has to be unique. `enable.partition.eof` makes the end of the log
/// observable.
pub fn consumer_config(config: &ConnectionConfig) -> ClientConfig {
    let mut client_config = admin_config(config);
    client_config
        .set("group.id", format!("kafkacli-{}", Uuid::new_v4()))
        .set("enable.auto.commit", "false")
        .set("enable.partition.eof", "true")
        .set("auto.offset.reset", "earliest");
    client_config
}

/// `BrokerClient` backed by librdkafka.
pub struct KafkaClient {
    consumer: BaseConsumer,
    admin: AdminClient<DefaultClientContext>,
    request_timeout: Duration,
    /// Offset of the next message the consumer will return.
    position: i64,
}

impl KafkaClient {
    /// Creates the clients and proves the cluster is reachable (and the
    /// credentials accepted) with one metadata round trip.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let consumer: BaseConsumer = consumer_config(config)
            .create()
            .map_err(|e| Error::Connection(format!("failed to create consumer: {e}")))?;
        let admin: AdminClient<DefaultClientContext> = admin_config(config)
            .create()
            .map_err(|e| Error::Connection(format!("failed to create admin client: {e}")))?;

        let metadata = consumer
            .fetch_metadata(None, config.dial_timeout)
            .map_err(|e| {
                Error::Connection(format!(
                    "unable to reach {}: {e}",
                    config.bootstrap_servers()
                ))
            })?;
        info!(
            brokers = metadata.brokers().len(),
            origin = metadata.orig_broker_name(),
            "kafka cluster reachable"
        );

        Ok(Self {
            consumer,
            admin,
            request_timeout: config.dial_timeout,
            position: 0,
        })
    }

    fn admin_options(&self) -> AdminOptions {
        AdminOptions::new()
            .request_timeout(Some(self.request_timeout))
            .operation_timeout(Some(self.request_timeout))
    }
}

/// Transport and authentication failures end the session; anything else is
/// the broker refusing the request.
fn classify(err: KafkaError, context: &str) -> Error {
    let transport = matches!(
        err.rdkafka_error_code(),
        Some(
            RDKafkaErrorCode::BrokerTransportFailure
                | RDKafkaErrorCode::AllBrokersDown
                | RDKafkaErrorCode::Resolve
                | RDKafkaErrorCode::Authentication
                | RDKafkaErrorCode::SaslAuthenticationFailed
                | RDKafkaErrorCode::NetworkException
        )
    );
    if transport {
        Error::Connection(format!("{context}: {err}"))
    } else {
        Error::Broker(format!("{context}: {err}"))
    }
}

impl BrokerClient for KafkaClient {
    fn fetch_partitions(&mut self) -> Result<Vec<PartitionDescriptor>> {
        let metadata = self
            .consumer
            .fetch_metadata(None, self.request_timeout)
            .map_err(|e| classify(e, "failed to fetch metadata"))?;

        let mut partitions = Vec::new();
        for topic in metadata.topics() {
            if let Some(err) = topic.error() {
                warn!(topic = topic.name(), error = ?err, "skipping topic with metadata error");
                continue;
            }
            partitions.extend(
                topic
                    .partitions()
                    .iter()
                    .map(|p| PartitionDescriptor::new(topic.name(), p.id())),
            );
        }
        Ok(partitions)
    }

    fn create_topic(&mut self, topic: &TopicName, partitions: i32) -> Result<()> {
        let new_topic = NewTopic::new(
            topic.as_str(),
            partitions,
            TopicReplication::Fixed(REPLICATION_FACTOR),
        );
        let results = block_on(self.admin.create_topics(&[new_topic], &self.admin_options()))
            .map_err(|e| classify(e, "create topic request failed"))?;

        for result in results {
            if let Err((name, code)) = result {
                return Err(Error::Broker(format!(
                    "failed to create topic '{name}': {code}"
                )));
            }
        }
        Ok(())
    }

    fn delete_topic(&mut self, topic: &TopicName) -> Result<()> {
        let results = block_on(
            self.admin
                .delete_topics(&[topic.as_str()], &self.admin_options()),
        )
        .map_err(|e| classify(e, "delete topic request failed"))?;

        for result in results {
            if let Err((name, code)) = result {
                return Err(Error::Broker(format!(
                    "failed to delete topic '{name}': {code}"
                )));
            }
        }
        Ok(())
    }

    fn fetch_offsets(&mut self, topic: &TopicName, partition: i32) -> Result<OffsetWindow> {
        let (low, high) = self
            .consumer
            .fetch_watermarks(topic.as_str(), partition, self.request_timeout)
            .map_err(|e| classify(e, &format!("failed to fetch offsets of '{topic}'")))?;
        Ok(OffsetWindow::new(low, high))
    }

    fn seek(&mut self, topic: &TopicName, partition: i32, offset: i64) -> Result<()> {
        let mut assignment = TopicPartitionList::new();
        assignment
            .add_partition_offset(topic.as_str(), partition, Offset::Offset(offset))
            .map_err(|e| classify(e, "invalid partition offset"))?;
        self.consumer
            .assign(&assignment)
            .map_err(|e| classify(e, &format!("failed to assign '{topic}'")))?;
        self.position = offset;
        debug!(topic = %topic, partition, offset, "reader positioned");
        Ok(())
    }

    fn next_message(&mut self) -> Result<Message> {
        loop {
            // Blocks with no deadline; only the end of the log or an error stops it.
            match self.consumer.poll(Timeout::Never) {
                None => continue,
                Some(Err(KafkaError::PartitionEOF(partition))) => {
                    debug!(partition, offset = self.position, "partition end reached");
                    return Ok(Message::new(self.position, Vec::new()));
                }
                Some(Err(e)) => return Err(classify(e, "failed to read message")),
                Some(Ok(msg)) => {
                    let message = Message {
                        offset: msg.offset(),
                        payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
                        timestamp: msg.timestamp().to_millis(),
                    };
                    self.position = message.offset + 1;
                    return Ok(message);
                }
            }
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.consumer.unassign() {
            debug!(error = %e, "unassign on close failed");
        }
    }
}
