//! Proctor version information.
//!
//! The version is exposed as a single constant so all subsystems (CLI,
//! stub service banner) agree on the same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! - Prefer this constant over repeating `env!("CARGO_PKG_VERSION")` in multiple places.

/// The proctor version string (for example, `0.1.0`).
pub const PROCTOR_VERSION: &str = env!("CARGO_PKG_VERSION");
