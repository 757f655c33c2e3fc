//! Clap-free settings for the quarterly computation.

/// Settings for one quarterly computation.
#[derive(Debug, Clone)]
pub struct ComputeSettings {
    /// Restrict the computation to one vehicle id.
    pub vehicle_filter: Option<String>,

    // Reconciliation policy
    /// Relative mileage difference past which a discrepancy is flagged.
    pub discrepancy_threshold: f64,

    /// Multiple of the threshold past which a fuel-derived finding is
    /// reported as an error instead of a warning.
    pub severe_ratio: f64,

    /// Externally imported mileage-tracker total for the same scope.
    pub tracker_miles: Option<f64>,
}

impl Default for ComputeSettings {
    fn default() -> Self {
        Self {
            vehicle_filter: None,
            discrepancy_threshold: 0.05,
            severe_ratio: 5.0,
            tracker_miles: None,
        }
    }
}

impl ComputeSettings {
    pub fn for_vehicle(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_filter: Some(vehicle_id.into()),
            ..Self::default()
        }
    }
}
