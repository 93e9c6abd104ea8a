use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::SettingKey;
use crate::utils::error::{Error, Result};

/// Read/write access to the JSON settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file contents exactly as stored.
    pub fn read_raw(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Replaces the value of `key` and writes the file back.
    ///
    /// An empty `value` leaves the file untouched. `MaxMessages` must be a
    /// non-negative integer.
    pub fn set(&self, key: SettingKey, value: &str) -> Result<()> {
        if value.is_empty() {
            debug!(key = %key, "empty value, settings left unchanged");
            return Ok(());
        }
        let value = parse_value(key, value)?;

        let mut settings = self.load_object()?;
        settings.insert(key.as_str().to_string(), value);
        self.write_object(&settings)?;

        info!(key = %key, path = %self.path.display(), "setting updated");
        Ok(())
    }

    fn load_object(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Config(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_object(&self, settings: &Map<String, Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string(settings)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

fn parse_value(key: SettingKey, value: &str) -> Result<Value> {
    match key {
        SettingKey::MaxMessages => value
            .trim()
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| {
                Error::Config(format!(
                    "MaxMessages must be a non-negative integer, got '{value}'"
                ))
            }),
        SettingKey::BrokerAddress | SettingKey::BrokerUserName | SettingKey::BrokerPassword => {
            Ok(Value::String(value.to_string()))
        }
    }
}
