//! Error definitions for the issue-stage simulator.
//!
//! This module defines the three failure domains of the crate:
//! 1. **Configuration Errors:** Rejected station parameters and unreadable config files.
//! 2. **Step Contract Violations:** Inputs a correct upstream stage never produces.
//! 3. **Simulation Errors:** Driver-level failures such as a workload that never drains.
//!
//! Expected stall conditions (a full station, no ready entries) are not errors; they
//! surface as ordinary step outputs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::types::Tag;

/// Invalid station or simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The station must hold at least one entry.
    #[error("station capacity must be at least 1")]
    ZeroCapacity,

    /// The upstream stage must be able to dispatch at least one instruction per cycle.
    #[error("dispatch width must be at least 1")]
    ZeroDispatchWidth,

    /// The result bus must carry at least one broadcast per cycle.
    #[error("broadcast width must be at least 1")]
    ZeroBroadcastWidth,

    /// At least one execution port is required.
    #[error("issue port count must be at least 1")]
    ZeroIssuePorts,

    /// A dispatch group wider than the station could never be admitted.
    #[error("dispatch width {width} exceeds station capacity {capacity}")]
    DispatchWiderThanCapacity {
        /// Configured dispatch width.
        width: usize,
        /// Configured station capacity.
        capacity: usize,
    },

    /// More ports than entries would leave ports permanently idle.
    #[error("issue port count {ports} exceeds station capacity {capacity}")]
    PortsExceedCapacity {
        /// Configured number of issue ports.
        ports: usize,
        /// Configured station capacity.
        capacity: usize,
    },

    /// The configuration text is not valid JSON for the expected schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Caller contract violation detected at the step boundary.
///
/// A step that fails with one of these is rejected before any state is read or
/// mutated; the station is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StepError {
    /// The dispatch group holds more candidates than the configured dispatch width.
    #[error("dispatch group of {len} exceeds dispatch width {max}")]
    DispatchOverflow {
        /// Number of candidates offered.
        len: usize,
        /// Configured dispatch width.
        max: usize,
    },

    /// The broadcast event holds more pairs than the configured bus width.
    #[error("broadcast event of {len} exceeds bus width {max}")]
    BroadcastOverflow {
        /// Number of pairs broadcast.
        len: usize,
        /// Configured broadcast width.
        max: usize,
    },

    /// Two producers announced the same tag in one step.
    #[error("tag {0} broadcast more than once in a single step")]
    DuplicateBroadcastTag(Tag),
}

/// Failure while driving a workload through an issue stage.
#[derive(Debug, Error)]
pub enum SimError {
    /// The stage rejected a step input.
    #[error(transparent)]
    Step(#[from] StepError),

    /// The workload itself is inconsistent with the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A dispatch group in the workload is wider than the configured dispatch width.
    #[error("workload group {index} has {len} instructions, dispatch width is {max}")]
    GroupTooWide {
        /// Position of the group in the workload.
        index: usize,
        /// Number of instructions in the group.
        len: usize,
        /// Configured dispatch width.
        max: usize,
    },

    /// The broadcasts scheduled for one cycle would violate the bus contract.
    #[error("broadcasts scheduled for cycle {cycle}: {source}")]
    BroadcastSchedule {
        /// Cycle whose merged broadcasts are invalid.
        cycle: u64,
        /// The violated bus constraint.
        #[source]
        source: StepError,
    },

    /// The workload did not drain within the cycle limit.
    #[error("workload did not drain after {cycles} cycles ({pending} groups pending, {occupied} entries occupied)")]
    Deadlock {
        /// Cycles simulated before giving up.
        cycles: u64,
        /// Dispatch groups still waiting upstream.
        pending: usize,
        /// Entries still occupied in the stage.
        occupied: usize,
    },
}
