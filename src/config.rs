//! # Run configuration.
//!
//! Provides [`Config`], the immutable run configuration loaded once before
//! the coordinator executes, plus the per-unit [`UnitConfig`] and the opaque
//! [`StorageConfig`] backend descriptor.
//!
//! Config is used in three ways:
//! 1. **Storage construction**: `storage::open(&config.storage)`
//! 2. **Coordinator**: one sync task spawned per entry in `config.units`
//! 3. **Liveness publisher**: `only_once` decides whether the health endpoint starts
//!
//! ## Field semantics
//! - `only_once`: finite single pass (`true`) vs continuous operation (`false`)
//! - `marker_file`: optional marker object to wait for before spawning units
//! - `poll_interval`: sleep between marker polls, YAML value in seconds
//! - `units`: ordered, names must be unique (enforced by [`Config::validate`])

use std::{net::SocketAddr, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::SetupError;

/// Immutable run configuration, loaded once at startup.
///
/// Deserialized from YAML; every field has a default so a minimal file only
/// needs `units` and `storage`:
///
/// ```yaml
/// storage:
///   type: fs
///   root: /srv/snapshots
/// units:
///   - name: shard-a
///   - name: shard-b
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Perform a single finite pass and exit instead of running continuously.
    #[serde(default)]
    pub only_once: bool,

    /// Marker object to wait for in storage before spawning sync tasks.
    ///
    /// `None` or empty disables the readiness gate entirely.
    #[serde(default)]
    pub marker_file: Option<String>,

    /// Interval between storage polls while waiting for the marker.
    #[serde(default = "default_poll_interval", with = "duration_secs")]
    pub poll_interval: Duration,

    /// Listen address for the health endpoint (continuous mode only).
    #[serde(default = "default_health_addr")]
    pub health_addr: SocketAddr,

    /// Data units to synchronize; one independent sync task per entry.
    #[serde(default)]
    pub units: Vec<UnitConfig>,

    /// Storage backend descriptor, opaque to the coordinator.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// One entry per data unit to synchronize.
///
/// The coordinator only uses `name`; `options` are passed through to the
/// syncer factory untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UnitConfig {
    /// Unique unit name, attached to every log line for this unit.
    pub name: String,

    /// Unit-specific options, opaque to the coordinator.
    #[serde(default)]
    pub options: serde_yaml::Mapping,
}

impl UnitConfig {
    /// Creates a unit config with the given name and no options.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: serde_yaml::Mapping::new(),
        }
    }
}

/// Storage backend selector.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory backend (tests and demos).
    #[default]
    Memory,

    /// Filesystem-directory backend: objects are files under `root`.
    Fs {
        /// Directory holding the objects; must exist at startup.
        root: std::path::PathBuf,
    },
}

impl StorageConfig {
    /// Short backend type name for logs and health metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageConfig::Memory => "memory",
            StorageConfig::Fs { .. } => "fs",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            only_once: false,
            marker_file: None,
            poll_interval: default_poll_interval(),
            health_addr: default_health_addr(),
            units: Vec::new(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Parses a YAML document and validates it.
    pub fn from_yaml_str(raw: &str) -> Result<Self, SetupError> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML config file, then validates it.
    pub async fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SetupError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&raw)
    }

    /// Checks invariants that serde cannot express.
    ///
    /// ### Rules
    /// - `poll_interval` must be non-zero
    /// - unit names must be non-empty
    /// - unit names must be unique
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.poll_interval.is_zero() {
            return Err(SetupError::invalid_config("poll_interval must be non-zero"));
        }
        let mut seen = std::collections::HashSet::new();
        for unit in &self.units {
            if unit.name.is_empty() {
                return Err(SetupError::invalid_config("unit name must not be empty"));
            }
            if !seen.insert(unit.name.as_str()) {
                return Err(SetupError::invalid_config(format!(
                    "duplicate unit name: {}",
                    unit.name
                )));
            }
        }
        Ok(())
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_health_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8500))
}

/// YAML `poll_interval: 0.25` ⇒ `Duration::from_secs_f64(0.25)`.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        // Rejects negative, non-finite, and overflowing values as parse
        // errors instead of panicking mid-startup.
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml() {
        let config = Config::from_yaml_str(
            r#"
storage:
  type: memory
units:
  - name: shard-a
  - name: shard-b
"#,
        )
        .unwrap();

        assert!(!config.only_once);
        assert_eq!(config.marker_file, None);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.units.len(), 2);
        assert_eq!(config.units[0].name, "shard-a");
        assert_eq!(config.storage.kind(), "memory");
    }

    #[test]
    fn test_full_yaml() {
        let config = Config::from_yaml_str(
            r#"
only_once: true
marker_file: ready.flag
poll_interval: 0.25
health_addr: "0.0.0.0:9100"
storage:
  type: fs
  root: /tmp/objects
units:
  - name: main
    options:
      schema: shadow
"#,
        )
        .unwrap();

        assert!(config.only_once);
        assert_eq!(config.marker_file.as_deref(), Some("ready.flag"));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.storage.kind(), "fs");
        assert!(!config.units[0].options.is_empty());
    }

    #[test]
    fn test_duplicate_unit_names_rejected() {
        let err = Config::from_yaml_str(
            r#"
units:
  - name: shard-a
  - name: shard-a
"#,
        )
        .unwrap_err();
        assert_eq!(err.as_label(), "setup_config_invalid");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = Config::from_yaml_str("poll_interval: 0\n").unwrap_err();
        assert_eq!(err.as_label(), "setup_config_invalid");
    }

    #[test]
    fn test_out_of_range_poll_interval_is_a_parse_error() {
        // Values a Duration cannot hold must error, not abort the process.
        let err = Config::from_yaml_str("poll_interval: 1.0e30\n").unwrap_err();
        assert_eq!(err.as_label(), "setup_config_parse");

        let err = Config::from_yaml_str("poll_interval: -1\n").unwrap_err();
        assert_eq!(err.as_label(), "setup_config_parse");
    }

    #[test]
    fn test_empty_unit_name_rejected() {
        let err = Config::from_yaml_str("units:\n  - name: \"\"\n").unwrap_err();
        assert_eq!(err.as_label(), "setup_config_invalid");
    }
}
