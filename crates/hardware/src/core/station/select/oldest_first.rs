//! Oldest-first arbiter.
//!
//! Grants ports in insertion order, the way an age matrix would. An entry that
//! stays ready only ever has older competitors ahead of it, so it issues once
//! those drain regardless of later arrivals.

use super::{Arbiter, Candidate};

/// Stateless age-ordered priority.
#[derive(Clone, Copy, Debug, Default)]
pub struct OldestFirstArbiter;

impl Arbiter for OldestFirstArbiter {
    fn select(&self, ready: &[Candidate], ports: usize) -> Vec<usize> {
        let mut by_age = ready.to_vec();
        by_age.sort_unstable_by_key(|c| (c.seq, c.slot));
        by_age.iter().take(ports).map(|c| c.slot).collect()
    }

    fn update(&mut self, _granted: &[usize]) {}

    fn reset(&mut self) {}
}
