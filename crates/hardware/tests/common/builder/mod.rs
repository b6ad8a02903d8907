//! Builders for step-interface values.

/// Dispatch candidate builder.
pub mod dispatch;
