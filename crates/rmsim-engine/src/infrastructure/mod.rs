//! Infrastructure Layer
//!
//! Everything that touches the outside world: reading schedule files and
//! loading configuration.

pub mod config;
pub mod loader;

pub use config::{ConfigError, SimulationConfig, TraceConfig};
pub use loader::{load_schedule_file, parse_schedule, ScheduleError};
