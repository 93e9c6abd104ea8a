use std::time::Duration;

use crate::config::settings::Settings;
use crate::utils::error::Error;

/// How long a dial (including the first metadata round trip) may take.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// SASL-PLAIN user name and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Resolved, immutable connection parameters handed to a broker session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub brokers: Vec<String>,
    pub credentials: Option<Credentials>,
    pub dial_timeout: Duration,
    pub max_messages: u64,
}

impl ConnectionConfig {
    /// Brokers joined back into a bootstrap list.
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

impl TryFrom<&Settings> for ConnectionConfig {
    type Error = Error;

    fn try_from(settings: &Settings) -> Result<Self, Self::Error> {
        let brokers: Vec<String> = settings
            .broker_address
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        if brokers.is_empty() {
            return Err(Error::Config("BrokerAddress is not set".to_string()));
        }

        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        let credentials = match (
            non_empty(&settings.broker_user_name),
            non_empty(&settings.broker_password),
        ) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "BrokerUserName and BrokerPassword must be set together".to_string(),
                ));
            }
        };

        let max_messages = u64::try_from(settings.max_messages).map_err(|_| {
            Error::Config(format!(
                "MaxMessages must not be negative, got {}",
                settings.max_messages
            ))
        })?;

        Ok(Self {
            brokers,
            credentials,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            max_messages,
        })
    }
}
