mod connection;
mod settings;

use std::path::Path;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, File, FileFormat};
use tracing::debug;

pub use connection::{ConnectionConfig, Credentials, DEFAULT_DIAL_TIMEOUT};
pub use settings::{SettingKey, Settings};

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads the settings file at `path`
/// Merges whatever it contains with default values; a missing file yields the defaults
/// Returns a `Settings` struct, not yet validated as a connection configuration
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::from(path).format(FileFormat::Json).required(false));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;
    debug!(path = %path.display(), "settings loaded");

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        broker_address: partial.broker_address.unwrap_or(default.broker_address),
        broker_user_name: partial.broker_user_name.or(default.broker_user_name),
        broker_password: partial.broker_password.or(default.broker_password),
        max_messages: partial.max_messages.unwrap_or(default.max_messages),
    })
}
