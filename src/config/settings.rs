use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Settings as persisted in the settings file.
///
/// Field names on disk follow the file format the tool has always written
/// (`BrokerAddress`, `MaxMessages`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(rename = "BrokerAddress")]
    pub broker_address: String,
    #[serde(rename = "BrokerUserName")]
    pub broker_user_name: Option<String>,
    #[serde(rename = "BrokerPassword")]
    pub broker_password: Option<String>,
    #[serde(rename = "MaxMessages")]
    pub max_messages: i64,
}

/// Partial settings loaded from the settings file.
///
/// Every field is optional; missing values are filled from `Settings::default()`.
/// The lowercase aliases cover sources that fold key case.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    #[serde(rename = "BrokerAddress", alias = "brokeraddress")]
    pub broker_address: Option<String>,
    #[serde(rename = "BrokerUserName", alias = "brokerusername")]
    pub broker_user_name: Option<String>,
    #[serde(rename = "BrokerPassword", alias = "brokerpassword")]
    pub broker_password: Option<String>,
    #[serde(rename = "MaxMessages", alias = "maxmessages")]
    pub max_messages: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker_address: "localhost:9092".to_string(),
            broker_user_name: None,
            broker_password: None,
            max_messages: 10,
        }
    }
}

/// A single settings key that `connection set` may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    #[value(name = "BrokerAddress")]
    BrokerAddress,
    #[value(name = "MaxMessages")]
    MaxMessages,
    #[value(name = "BrokerUserName")]
    BrokerUserName,
    #[value(name = "BrokerPassword")]
    BrokerPassword,
}

impl SettingKey {
    /// Key name as written in the settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::BrokerAddress => "BrokerAddress",
            SettingKey::MaxMessages => "MaxMessages",
            SettingKey::BrokerUserName => "BrokerUserName",
            SettingKey::BrokerPassword => "BrokerPassword",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
