//! Port traits abstracting the persistence collaborator away from the
//! pipeline.

use fueltax_types::quarter::Quarter;
use fueltax_types::raw::{RawFuelRecord, RawTripRecord};

/// Source of raw trip rows for a user and quarter.
pub trait TripSource {
    fn fetch_trips(&self, user_id: &str, quarter: Quarter) -> anyhow::Result<Vec<RawTripRecord>>;
}

/// Source of raw fuel purchase rows for a user and quarter.
///
/// With `ifta_eligible_only` the source should pre-filter to
/// tax-relevant fuel types; the normalizer quarantines anything
/// ineligible that slips through.
pub trait FuelSource {
    fn fetch_fuel_entries(
        &self,
        user_id: &str,
        quarter: Quarter,
        ifta_eligible_only: bool,
    ) -> anyhow::Result<Vec<RawFuelRecord>>;
}
