//! Issue stage core.
//!
//! This module contains the reservation station and the interfaces around it:
//! 1. **Signals:** Per-cycle input and output bundles of the step interface.
//! 2. **Station:** Entry table, wakeup unit, admission controller, and select unit.
//! 3. **Traits:** The `IssueStage` interface the simulation driver is generic over.

/// Step interface bundles (dispatch candidates, broadcasts, issue packets).
pub mod signals;

/// Reservation station and its component units.
pub mod station;

/// Trait implemented by clocked issue stages.
pub mod traits;

pub use self::station::ReservationStation;
pub use self::traits::IssueStage;
