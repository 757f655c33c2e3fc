//! Domain logic: turn raw trip and fuel rows into a deterministic
//! quarterly summary.
//!
//! This crate owns *what* the report says and why. It performs no I/O;
//! fetching records and consuming the summary belong to the
//! `fueltax-core` pipeline and its embedders.

mod aggregate;
mod builder;
mod economy;
mod normalize;
mod reconcile;
mod taxable;

pub use aggregate::aggregate;
pub use builder::build_summary;
pub use economy::fleet_mpg;
pub use normalize::{normalize, NormalizedBatch};
pub use reconcile::{reconcile, ReconcileOptions};
pub use taxable::{tax_figures, taxable_rows, TaxFigures};
