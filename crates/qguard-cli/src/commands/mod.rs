//! CLI command implementations for qguard.

pub mod escape;
pub mod render;
