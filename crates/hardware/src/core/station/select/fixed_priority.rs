//! Fixed-priority arbiter.
//!
//! The lowest-index ready entries win. An entry competing with fewer than
//! `ports` others issues at once, but under sustained load high slots can wait
//! indefinitely while low slots are refilled.

use super::{Arbiter, Candidate};

/// Stateless ascending-slot priority.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedPriorityArbiter;

impl Arbiter for FixedPriorityArbiter {
    fn select(&self, ready: &[Candidate], ports: usize) -> Vec<usize> {
        ready.iter().take(ports).map(|c| c.slot).collect()
    }

    fn update(&mut self, _granted: &[usize]) {}

    fn reset(&mut self) {}
}
