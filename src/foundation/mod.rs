//! Shared value types, numeric helpers and the crate error type.

/// Geometry and colour value types.
pub mod core;
/// Crate-wide error taxonomy.
pub mod error;
/// Hashing, quantization and interpolation helpers shared by both backends.
pub mod math;
