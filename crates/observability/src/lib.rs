//! Tracing/logging setup shared by robodepot binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;
