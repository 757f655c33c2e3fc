//! Last-request-wins coordination for overlapping computations.
//!
//! The engine itself is pure and synchronous; races only exist at the
//! boundary where the embedder fetches inputs asynchronously. Each
//! computation request takes a generation token, and any outcome whose
//! generation is no longer the latest is discarded whole — partial
//! application of two generations' outputs is impossible by
//! construction.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing token identifying one computation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Hands out generations and accepts only the latest one's outcome.
///
/// Lock-free; safe to share across threads.
#[derive(Debug, Default)]
pub struct GenerationGate {
    latest: AtomicU64,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new computation request, superseding all earlier ones.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `generation` is still the latest request.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Keep `value` only if `generation` is still the latest request.
    pub fn accept<T>(&self, generation: Generation, value: T) -> Option<T> {
        if self.is_current(generation) {
            Some(value)
        } else {
            None
        }
    }
}
