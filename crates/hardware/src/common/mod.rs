//! Common types used throughout the issue-stage simulator.
//!
//! This module provides the scalar building blocks shared by every component:
//! 1. **Value Types:** The operand word width, producer tags, and opaque opcodes.
//! 2. **Error Handling:** Configuration, step-contract, and simulation errors.

/// Error types for configuration, step contract violations, and simulation.
pub mod error;

/// Tag, opcode, and word definitions.
pub mod types;

pub use error::{ConfigError, SimError, StepError};
pub use types::{Opcode, Tag, Word};
