//! Simulation driver tests.

/// Simulator loop against real and mocked stages.
pub mod simulator;
