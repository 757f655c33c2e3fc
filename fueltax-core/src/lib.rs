//! Embeddable core library for fueltax.
//!
//! Provides an I/O-free entry point suitable for linking into the
//! surrounding fleet application or any other host process.
//!
//! # Port traits
//!
//! Record fetching is abstracted behind port traits in [`ports`]:
//! - [`TripSource`](ports::TripSource) — fetch raw trip rows
//! - [`FuelSource`](ports::FuelSource) — fetch raw fuel purchase rows
//!
//! The engine never issues these calls on its own schedule; a full
//! computation is triggered by the embedder (quarter changed, filter
//! changed, records changed) and handed the fetched snapshots.
//!
//! # Entry points
//!
//! - [`compute_quarterly_summary`](pipeline::compute_quarterly_summary)
//!   — compute a summary from already-fetched rows
//! - [`run_quarterly`](pipeline::run_quarterly) — fetch through the
//!   ports, then compute
//!
//! # Overlapping computations
//!
//! When fetches are asynchronous, triggers can outpace completions.
//! [`GenerationGate`](gate::GenerationGate) implements the last-request-wins
//! discipline: tag each computation with [`begin`](gate::GenerationGate::begin)
//! and discard any outcome whose generation is no longer the latest.

pub mod gate;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use gate::{Generation, GenerationGate};
pub use pipeline::{compute_quarterly_summary, run_quarterly, ComputeOutcome, EngineError};
pub use settings::ComputeSettings;

// Re-export the value types embedders need so they don't have to
// depend on fueltax-types directly.
pub use fueltax_types::quarter::{Quarter, QuarterParseError};
pub use fueltax_types::summary::QuarterlySummary;
