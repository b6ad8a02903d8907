//! Workload description.
//!
//! A workload is a JSON document listing what the collaborators of the issue
//! stage do over time:
//!
//! ```json
//! {
//!     "groups": [
//!         [{ "opcode": 1, "dest": 3,
//!            "src1": { "value": 100, "ready": true },
//!            "src2": { "tag": 10, "ready": false } }]
//!     ],
//!     "broadcasts": [{ "cycle": 4, "results": [{ "tag": 10, "value": 7 }] }],
//!     "flushes": [20]
//! }
//! ```
//!
//! Groups are offered in order by the upstream model; broadcasts and flushes
//! happen at the listed cycles regardless of what the station is doing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::{ConfigError, SimError, StepError};
use crate::config::StationConfig;
use crate::core::signals::{Broadcast, DispatchOp};

/// Result-bus activity scheduled for one cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedBroadcast {
    /// Cycle on which the pairs are visible.
    pub cycle: u64,
    /// Pairs broadcast that cycle.
    pub results: Vec<Broadcast>,
}

/// Everything the upstream stage, execution units, and flush controller do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Dispatch groups in program order.
    #[serde(default)]
    pub groups: Vec<Vec<DispatchOp>>,
    /// Scheduled result broadcasts.
    #[serde(default)]
    pub broadcasts: Vec<TimedBroadcast>,
    /// Cycles at which the station is flushed before stepping.
    #[serde(default)]
    pub flushes: Vec<u64>,
}

impl Workload {
    /// Parses a workload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` wrapping the parse error.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let workload = serde_json::from_str(text).map_err(ConfigError::from)?;
        Ok(workload)
    }

    /// Reads and parses a workload file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks the workload against the station's widths.
    ///
    /// Every group must fit the dispatch width, and the broadcasts of each cycle,
    /// merged across entries that share it, must fit the bus with no tag repeated.
    ///
    /// # Errors
    ///
    /// Returns `SimError::GroupTooWide` for the first oversized group, or
    /// `SimError::BroadcastSchedule` for the first cycle breaking the bus contract.
    pub fn validate(&self, station: &StationConfig) -> Result<(), SimError> {
        for (index, group) in self.groups.iter().enumerate() {
            if group.len() > station.dispatch_width {
                return Err(SimError::GroupTooWide {
                    index,
                    len: group.len(),
                    max: station.dispatch_width,
                });
            }
        }
        for (&cycle, results) in &self.broadcast_schedule() {
            check_bus(results, station.broadcast_width)
                .map_err(|source| SimError::BroadcastSchedule { cycle, source })?;
        }
        Ok(())
    }

    /// Broadcast pairs keyed by cycle, merging entries that name the same cycle.
    pub fn broadcast_schedule(&self) -> BTreeMap<u64, Vec<Broadcast>> {
        let mut schedule: BTreeMap<u64, Vec<Broadcast>> = BTreeMap::new();
        for timed in &self.broadcasts {
            schedule
                .entry(timed.cycle)
                .or_default()
                .extend(timed.results.iter().copied());
        }
        schedule
    }

    /// Total number of instructions across all groups.
    pub fn instruction_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

fn check_bus(results: &[Broadcast], width: usize) -> Result<(), StepError> {
    if results.len() > width {
        return Err(StepError::BroadcastOverflow {
            len: results.len(),
            max: width,
        });
    }
    for (i, b) in results.iter().enumerate() {
        if results[i + 1..].iter().any(|other| other.tag == b.tag) {
            return Err(StepError::DuplicateBroadcastTag(b.tag));
        }
    }
    Ok(())
}
