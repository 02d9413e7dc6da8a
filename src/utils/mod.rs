//! Utility helpers.

/// External editor resolution and invocation.
pub mod editor;
