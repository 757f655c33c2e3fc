//! Taxable gallons per jurisdiction.

use fueltax_types::jurisdiction::JurisdictionCode;
use fueltax_types::summary::{JurisdictionRow, JurisdictionTotals};
use std::collections::BTreeMap;

/// Derived tax figures for one jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxFigures {
    pub taxable_gallons: Option<f64>,
    pub gallons_due_or_credit: Option<f64>,
    pub low_confidence: bool,
}

/// Convert a single jurisdiction's miles into taxable gallons using the
/// fleet economy.
///
/// `taxable_gallons = miles_driven / mpg`; `gallons_due_or_credit =
/// taxable_gallons - gallons_purchased` (positive = under-purchased
/// there relative to miles driven, negative = credit). With no usable
/// MPG the figures are `None` and the row is marked low-confidence
/// rather than silently substituting zero.
///
/// All figures are carried at full precision; rounding is the
/// renderer's job, so recomputation is exact and idempotent.
pub fn tax_figures(totals: &JurisdictionTotals, mpg: Option<f64>) -> TaxFigures {
    match mpg {
        Some(mpg) if mpg > 0.0 => {
            let taxable = totals.miles_driven / mpg;
            TaxFigures {
                taxable_gallons: Some(taxable),
                gallons_due_or_credit: Some(taxable - totals.gallons_purchased),
                low_confidence: false,
            }
        }
        _ => TaxFigures {
            taxable_gallons: None,
            gallons_due_or_credit: None,
            low_confidence: true,
        },
    }
}

/// Build the per-jurisdiction report rows, in the map's ascending key
/// order.
pub fn taxable_rows(
    totals: &BTreeMap<JurisdictionCode, JurisdictionTotals>,
    mpg: Option<f64>,
) -> Vec<JurisdictionRow> {
    totals
        .iter()
        .map(|(jurisdiction, t)| {
            let figures = tax_figures(t, mpg);
            JurisdictionRow {
                jurisdiction: jurisdiction.clone(),
                miles_driven: t.miles_driven,
                gallons_purchased: t.gallons_purchased,
                fuel_cost: t.fuel_cost,
                taxable_gallons: figures.taxable_gallons,
                gallons_due_or_credit: figures.gallons_due_or_credit,
                low_confidence: figures.low_confidence,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn totals(miles: f64, gallons: f64) -> JurisdictionTotals {
        JurisdictionTotals {
            miles_driven: miles,
            gallons_purchased: gallons,
            fuel_cost: 0.0,
        }
    }

    #[test]
    fn computes_surplus_and_deficit() {
        let tx = tax_figures(&totals(500.0, 60.0), Some(8.0));
        assert_eq!(tx.taxable_gallons, Some(62.5));
        assert_eq!(tx.gallons_due_or_credit, Some(2.5));
        assert!(!tx.low_confidence);

        let ok = tax_figures(&totals(300.0, 40.0), Some(8.0));
        assert_eq!(ok.taxable_gallons, Some(37.5));
        assert_eq!(ok.gallons_due_or_credit, Some(-2.5));
    }

    #[test]
    fn null_mpg_marks_low_confidence() {
        for mpg in [None, Some(0.0), Some(-1.0)] {
            let figures = tax_figures(&totals(500.0, 0.0), mpg);
            assert_eq!(figures.taxable_gallons, None);
            assert_eq!(figures.gallons_due_or_credit, None);
            assert!(figures.low_confidence);
        }
    }

    #[test]
    fn rows_follow_map_order() {
        let mut map = BTreeMap::new();
        map.insert(JurisdictionCode::normalize("TX"), totals(500.0, 60.0));
        map.insert(JurisdictionCode::normalize("OK"), totals(300.0, 40.0));

        let rows = taxable_rows(&map, Some(8.0));
        let codes: Vec<&str> = rows.iter().map(|r| r.jurisdiction.as_str()).collect();
        assert_eq!(codes, vec!["OK", "TX"]);
        assert_eq!(rows[1].taxable_gallons, Some(62.5));
    }
}
