//! Select / arbitration policies.
//!
//! Chooses up to one ready entry per execution port each cycle. Selection is a
//! pure function of the pre-step ready set; any policy state advances only at
//! commit through [`Arbiter::update`].
//!
//! # Policies
//!
//! - `RoundRobin`: rotating priority starting past the last granted slot.
//! - `FixedPriority`: lowest slot index wins.
//! - `OldestFirst`: earliest inserted entry wins.

/// Fixed priority by ascending slot index.
pub mod fixed_priority;

/// Age-ordered selection.
pub mod oldest_first;

/// Rotating-priority selection.
pub mod round_robin;

use std::fmt;

pub use fixed_priority::FixedPriorityArbiter;
pub use oldest_first::OldestFirstArbiter;
pub use round_robin::RoundRobinArbiter;

use crate::config::Arbitration;

/// A ready entry competing for a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Entry slot.
    pub slot: usize,
    /// Insertion sequence number; lower is older.
    pub seq: u64,
}

/// Trait for select policies.
pub trait Arbiter: fmt::Debug + Send + Sync {
    /// Picks up to `ports` distinct slots from `ready`.
    ///
    /// `ready` is sorted by ascending slot. The returned slots are in port order:
    /// element `i` is issued on port `i`.
    fn select(&self, ready: &[Candidate], ports: usize) -> Vec<usize>;

    /// Advances policy state after `granted` slots were issued.
    fn update(&mut self, granted: &[usize]);

    /// Returns the policy to its power-on state.
    fn reset(&mut self);
}

/// Builds the arbiter selected by `policy` for a station of `capacity` entries.
pub fn build(policy: Arbitration, capacity: usize) -> Box<dyn Arbiter> {
    match policy {
        Arbitration::RoundRobin => Box::new(RoundRobinArbiter::new(capacity)),
        Arbitration::FixedPriority => Box::new(FixedPriorityArbiter),
        Arbitration::OldestFirst => Box::new(OldestFirstArbiter),
    }
}
