//! Out-of-order issue stage simulator library.
//!
//! This crate implements a cycle-accurate model of a Tomasulo-style issue stage with the following:
//! 1. **Station:** A fixed-capacity reservation station with tag-based wakeup, atomic group
//!    admission with backpressure, and multi-port select/arbitration.
//! 2. **Signals:** The per-cycle step interface (dispatch groups, broadcast events, issue packets).
//! 3. **Configuration:** Capacity, widths, port count, and arbitration policy.
//! 4. **Simulation:** A clocked driver that models the upstream dispatch stage and the result bus.
//! 5. **Statistics:** Admission, wakeup, and select counters.

/// Common types (tags, opcodes, words) and error definitions.
pub mod common;
/// Station configuration (defaults, arbitration policy, driver settings).
pub mod config;
/// Issue stage core (reservation station, step interface, stage trait).
pub mod core;
/// Clocked simulation driver and workload description.
pub mod sim;
/// Issue-stage statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The reservation station; construct with `ReservationStation::new`.
pub use crate::core::ReservationStation;
/// Workload driver; owns an issue stage and the upstream dispatch model.
pub use crate::sim::Simulator;
