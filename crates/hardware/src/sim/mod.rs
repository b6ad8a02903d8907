//! Simulation driver and workload description.
//!
//! Models the collaborators around the issue stage so a workload can run end to end:
//! 1. **Workload:** Dispatch groups in program order, timed result broadcasts, and flushes.
//! 2. **Upstream:** A dispatch stage that honors backpressure and re-offers rejected groups unchanged.
//! 3. **Simulator:** Clocks an issue stage, feeds it, and logs every issued packet.

/// Clocked driver owning the issue stage.
pub mod simulator;

/// Upstream dispatch stage model.
pub mod upstream;

/// Workload file format.
pub mod workload;

pub use simulator::{IssueRecord, Simulator};
pub use upstream::Upstream;
pub use workload::{TimedBroadcast, Workload};
