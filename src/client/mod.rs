//! The `client` module connects broker sessions to a real Kafka cluster.
//!
//! It provides `KafkaClient`, the `BrokerClient` implementation built on
//! `rdkafka`, along with the client settings derived from a `ConnectionConfig`.

pub mod kafka_client;
pub use kafka_client::{KafkaClient, admin_config, consumer_config};
