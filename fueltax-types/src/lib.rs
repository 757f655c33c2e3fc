//! Shared DTOs (schemas-as-code) for the fueltax workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk and diffed.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod jurisdiction;
pub mod quarter;
pub mod raw;
pub mod record;
pub mod summary;

/// Schema identifiers.
pub mod schema {
    pub const FUELTAX_SUMMARY_V1: &str = "fueltax.summary.v1";
}
