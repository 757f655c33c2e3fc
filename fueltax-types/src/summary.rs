use crate::jurisdiction::JurisdictionCode;
use crate::quarter::Quarter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accumulated activity in one jurisdiction. Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionTotals {
    pub miles_driven: f64,
    pub gallons_purchased: f64,
    pub fuel_cost: f64,
}

/// One report row: the totals of a jurisdiction plus the derived tax
/// figures. `taxable_gallons` is `None` (with `low_confidence`) when no
/// fuel economy could be established.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRow {
    pub jurisdiction: JurisdictionCode,
    pub miles_driven: f64,
    pub gallons_purchased: f64,
    pub fuel_cost: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxable_gallons: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallons_due_or_credit: Option<f64>,

    #[serde(default)]
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub trips: u64,
    pub miles: f64,
    pub gallons: f64,
    pub fuel_cost: f64,
    pub jurisdictions: u64,
}

/// The quarterly report artifact. Built fresh on every computation and
/// never mutated in place; two runs over identical inputs serialize
/// byte-for-byte identically (see `fingerprint`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlySummary {
    /// Schema identifier, [`crate::schema::FUELTAX_SUMMARY_V1`].
    pub schema: String,

    pub quarter: Quarter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_filter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_mpg: Option<f64>,

    /// One row per jurisdiction touched, ascending by code.
    #[serde(default)]
    pub per_jurisdiction: Vec<JurisdictionRow>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discrepancies: Vec<Discrepancy>,

    pub totals: SummaryTotals,

    /// SHA-256 over the canonical JSON of everything above.
    pub fingerprint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// Trip miles diverge from miles implied by fuel purchases.
    FuelImpliedMileageGap,
    /// Trip miles diverge from an independently imported tracker total.
    /// Same-unit comparison, reported at higher severity.
    TrackerMileageGap,
    /// Miles logged in a jurisdiction with no fuel purchased there.
    MilesWithoutFuel,
    /// Fuel purchased in a jurisdiction with no miles logged there.
    FuelWithoutMiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warn,
    Error,
}

/// A flagged inconsistency between two independently derived measures
/// of the same quantity. Reconciliation only reports; it never alters
/// the totals it checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Deterministic id (UUIDv5 over the stable key).
    pub id: Uuid,

    pub kind: DiscrepancyKind,

    /// `None` for fleet-scope findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<JurisdictionCode>,

    /// Value from the primary (trip) source.
    pub expected: f64,

    /// Value from the secondary source. Units per kind: miles for the
    /// mileage-gap kinds, gallons for [`DiscrepancyKind::FuelWithoutMiles`].
    pub actual: f64,

    pub severity: Severity,

    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Trip,
    Fuel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NonNumericMiles,
    NegativeMiles,
    NonNumericGallons,
    NegativeGallons,
    NonNumericCost,
    NegativeCost,
    EmptySegments,
    SegmentSumMismatch,
    MissingField,
    QuarterMismatch,
    IneligibleFuelType,
}

/// A quarantined input row. Rejections are data, not errors: the
/// computation proceeds on the remaining valid rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub source: RecordSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    pub reason: RejectReason,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
