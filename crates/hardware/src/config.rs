//! Configuration system for the issue-stage simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** The reference configuration (16 entries, 4-wide dispatch, 4-wide bus, 2 ports).
//! 2. **Structures:** Station geometry and simulation driver settings.
//! 3. **Enums:** The arbitration policy used by the select unit.
//!
//! Configuration is supplied as JSON (`Config::from_json`, `Config::from_file`) or
//! built with `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the reference configuration when not explicitly
/// overridden in a JSON configuration.
mod defaults {
    /// Number of reservation station entries.
    pub const CAPACITY: usize = 16;

    /// Maximum number of instructions offered by the upstream stage per cycle.
    pub const DISPATCH_WIDTH: usize = 4;

    /// Maximum number of `(tag, value)` pairs on the result bus per cycle.
    pub const BROADCAST_WIDTH: usize = 4;

    /// Number of execution ports fed by the select unit.
    pub const ISSUE_PORTS: usize = 2;

    /// Cycle limit after which an undrained workload is reported as deadlocked.
    pub const MAX_CYCLES: u64 = 10_000;
}

/// Arbitration policy used when more entries are ready than there are ports.
///
/// Every policy grants each port at most one entry and never grants one entry
/// to two ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Arbitration {
    /// Rotating priority.
    ///
    /// The search for ready entries starts one slot past the last slot granted,
    /// so a continuously ready entry is granted within `capacity` cycles.
    #[default]
    RoundRobin,
    /// Fixed priority by ascending slot index.
    ///
    /// An entry competing with fewer than `issue_ports` others issues at once;
    /// under sustained load the highest slots can starve.
    FixedPriority,
    /// Age order: the entry inserted earliest wins.
    OldestFirst,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use tomasim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.station.capacity, 16);
/// assert_eq!(config.station.issue_ports, 2);
/// ```
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use tomasim_core::config::{Arbitration, Config};
///
/// let json = r#"{
///     "station": {
///         "capacity": 32,
///         "issue_ports": 4,
///         "arbitration": "OldestFirst"
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.station.capacity, 32);
/// assert_eq!(config.station.dispatch_width, 4);
/// assert_eq!(config.station.arbitration, Arbitration::OldestFirst);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Reservation station geometry and arbitration.
    #[serde(default)]
    pub station: StationConfig,
    /// Simulation driver settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and the matching
    /// validation error for inconsistent station parameters.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.station.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Reservation station geometry.
///
/// The reference configuration is N=16 entries, K=4 dispatch width,
/// B=4 broadcast width, and P=2 issue ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Number of entries (N).
    #[serde(default = "StationConfig::default_capacity")]
    pub capacity: usize,

    /// Maximum dispatch group size (K). Admission readiness requires this many free entries.
    #[serde(default = "StationConfig::default_dispatch_width")]
    pub dispatch_width: usize,

    /// Maximum broadcast pairs per cycle (B).
    #[serde(default = "StationConfig::default_broadcast_width")]
    pub broadcast_width: usize,

    /// Number of execution ports (P).
    #[serde(default = "StationConfig::default_issue_ports")]
    pub issue_ports: usize,

    /// Select policy among competing ready entries.
    #[serde(default)]
    pub arbitration: Arbitration,
}

impl StationConfig {
    /// Returns the default station capacity.
    fn default_capacity() -> usize {
        defaults::CAPACITY
    }

    /// Returns the default dispatch width.
    fn default_dispatch_width() -> usize {
        defaults::DISPATCH_WIDTH
    }

    /// Returns the default broadcast width.
    fn default_broadcast_width() -> usize {
        defaults::BROADCAST_WIDTH
    }

    /// Returns the default issue port count.
    fn default_issue_ports() -> usize {
        defaults::ISSUE_PORTS
    }

    /// Checks that the geometry describes a station that can make progress.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: every width and the capacity must be
    /// non-zero, and neither the dispatch width nor the port count may exceed the
    /// capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.dispatch_width == 0 {
            return Err(ConfigError::ZeroDispatchWidth);
        }
        if self.broadcast_width == 0 {
            return Err(ConfigError::ZeroBroadcastWidth);
        }
        if self.issue_ports == 0 {
            return Err(ConfigError::ZeroIssuePorts);
        }
        if self.dispatch_width > self.capacity {
            return Err(ConfigError::DispatchWiderThanCapacity {
                width: self.dispatch_width,
                capacity: self.capacity,
            });
        }
        if self.issue_ports > self.capacity {
            return Err(ConfigError::PortsExceedCapacity {
                ports: self.issue_ports,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            dispatch_width: defaults::DISPATCH_WIDTH,
            broadcast_width: defaults::BROADCAST_WIDTH,
            issue_ports: defaults::ISSUE_PORTS,
            arbitration: Arbitration::default(),
        }
    }
}

/// Simulation driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Cycle limit before an undrained workload is reported as deadlocked.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// When true the upstream model only offers a group while `admission_ready`
    /// is asserted; when false it offers every cycle and relies on group rejection.
    #[serde(default = "GeneralConfig::default_honor_backpressure")]
    pub honor_backpressure: bool,
}

impl GeneralConfig {
    /// Returns the default cycle limit.
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }

    /// Backpressure is honored unless explicitly disabled.
    fn default_honor_backpressure() -> bool {
        true
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
            honor_backpressure: true,
        }
    }
}
