use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TrackerError;

/// Tracker settings, usually read from a `[tracker]`-style TOML table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Shown in every log line of the tracker.
    pub name: String,
    /// Start tracking a service first seen through a modification.
    pub track_on_modified: bool,
    /// Upper bound on simultaneously tracked services.
    pub max_tracked: Option<usize>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { name: "tracker".to_owned(), track_on_modified: true, max_tracked: None }
    }
}

impl TrackingConfig {
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::invalid_config("name must not be empty"));
        }
        if self.max_tracked == Some(0) {
            return Err(TrackerError::invalid_config("max_tracked must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = TrackingConfig::from_toml("").expect("parse");
        assert_eq!(config, TrackingConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = TrackingConfig::from_toml("max_tracked = 4\n").expect("parse");
        assert_eq!(config.max_tracked, Some(4));
        assert_eq!(config.name, "tracker");
        assert!(config.track_on_modified);
    }

    #[test]
    fn blank_name_is_invalid() {
        let config = TrackingConfig::from_toml("name = \"  \"\n").expect("parse");
        let err = config.validate().expect_err("blank name");
        assert_eq!(err.to_string(), "invalid tracking config: name must not be empty");
    }

    #[test]
    fn wrong_type_fails_to_parse() {
        assert!(TrackingConfig::from_toml("track_on_modified = \"yes\"\n").is_err());
    }
}
