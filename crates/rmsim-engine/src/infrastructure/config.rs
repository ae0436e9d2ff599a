//! Simulation configuration
//!
//! Every field has a default, so an override file only needs the keys it
//! changes:
//!
//! ```json
//! { "max_tasks": 500, "trace": { "enabled": true } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::trace::DEFAULT_MAX_EVENTS;
use crate::domain::{ManagerKind, Schedule, SimulatorBuilder, UnknownManager};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A limit was set to zero
    #[error("`{0}` must be greater than zero")]
    ZeroLimit(&'static str),

    /// Manager name not recognised
    #[error(transparent)]
    UnknownManager(#[from] UnknownManager),
}

/// Event trace settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Record dispatches, aborts and rollbacks
    pub enabled: bool,
    /// Upper bound on stored events
    pub max_events: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_events: DEFAULT_MAX_EVENTS,
        }
    }
}

/// Limits and options for loading and running a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Largest accepted task population
    pub max_tasks: usize,
    /// Largest accepted number of resource types
    pub max_resource_types: usize,
    /// Largest accepted number of activity groups
    pub max_groups: usize,
    /// Largest accepted number of activities in one group
    pub max_group_len: usize,
    /// Resource manager to simulate
    pub manager: ManagerKind,
    /// Event trace settings
    pub trace: TraceConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_tasks: 100,
            max_resource_types: 100,
            max_groups: 50,
            max_group_len: 300,
            manager: ManagerKind::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load overrides from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parse overrides from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Select the manager by name (`fifo` or `opportunistic`)
    pub fn select_manager(&mut self, name: &str) -> Result<(), ConfigError> {
        self.manager = name.parse()?;
        Ok(())
    }

    /// Reject limits that would make every schedule invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_tasks", self.max_tasks),
            ("max_resource_types", self.max_resource_types),
            ("max_groups", self.max_groups),
            ("max_group_len", self.max_group_len),
        ];
        if let Some(&(name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroLimit(name));
        }
        if self.trace.enabled && self.trace.max_events == 0 {
            return Err(ConfigError::ZeroLimit("trace.max_events"));
        }
        Ok(())
    }

    /// Simulator builder carrying this configuration
    pub fn simulator_builder(&self, schedule: Schedule) -> SimulatorBuilder {
        SimulatorBuilder::new(schedule)
            .manager(self.manager)
            .enable_tracing(self.trace.enabled)
            .max_traced_events(self.trace.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.max_tasks, 100);
        assert_eq!(config.max_resource_types, 100);
        assert_eq!(config.max_groups, 50);
        assert_eq!(config.max_group_len, 300);
        assert_eq!(config.manager, ManagerKind::Opportunistic);
        assert!(!config.trace.enabled);
        assert_eq!(config.trace.max_events, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config =
            SimulationConfig::from_json_str(r#"{ "max_tasks": 7, "trace": { "enabled": true } }"#)
                .unwrap();
        assert_eq!(config.max_tasks, 7);
        assert_eq!(config.max_groups, 50);
        assert!(config.trace.enabled);
        assert_eq!(config.trace.max_events, DEFAULT_MAX_EVENTS);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "max_taks": 7 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_manager_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "manager": "banker" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let mut config = SimulationConfig::default();
        let err = config.select_manager("banker").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownManager(_)));
        assert!(config.select_manager("FIFO").is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = SimulationConfig {
            max_groups: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLimit("max_groups"))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_group_len": 12 }}"#).unwrap();

        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_group_len, 12);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimulationConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
