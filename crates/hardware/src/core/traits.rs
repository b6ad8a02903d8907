//! Issue Stage Interface.
//!
//! This module defines the trait shared by clocked issue stages. It provides:
//! 1. **Step:** One synchronous cycle from structured inputs to structured outputs.
//! 2. **Backpressure:** The admission signal the upstream stage samples before dispatching.
//! 3. **Cancellation:** Reset and flush hooks driven by an external controller.

use crate::common::error::StepError;
use crate::core::signals::{StepInput, StepOutput};

/// A clocked issue stage.
///
/// Implementations observe one consistent snapshot per step and commit all of
/// that step's effects together at the step boundary.
pub trait IssueStage {
    /// Executes one clock cycle.
    ///
    /// # Errors
    ///
    /// Returns a `StepError` when `input` violates the caller contract; the stage
    /// state is unchanged in that case.
    fn step(&mut self, input: &StepInput) -> Result<StepOutput, StepError>;

    /// The `admission_ready` value the next step will report.
    fn admission_ready(&self) -> bool;

    /// Number of occupied entries.
    fn occupancy(&self) -> usize;

    /// Discards every pending entry, keeping non-entry state.
    fn flush(&mut self);

    /// Returns the stage to its power-on state.
    fn reset(&mut self);
}
