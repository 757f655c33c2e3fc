//! Rendering helpers (markdown) for human-readable artifacts.
//!
//! This is the presentation boundary: all gallon and mile figures are
//! carried at full precision through the engine and rounded here, and
//! only here.

use fueltax_types::summary::{QuarterlySummary, RejectedRecord, Severity};

pub fn render_summary_md(summary: &QuarterlySummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("# IFTA summary {}\n\n", summary.quarter));

    if let Some(vehicle) = &summary.vehicle_filter {
        out.push_str(&format!("- Vehicle: `{}`\n", vehicle));
    }
    out.push_str(&format!("- Trips: {}\n", summary.totals.trips));
    out.push_str(&format!(
        "- Fleet economy: {}\n",
        summary
            .fleet_mpg
            .map(|mpg| format!("{:.2} mpg", mpg))
            .unwrap_or_else(|| "not determinable".to_string())
    ));
    out.push_str(&format!(
        "- Jurisdictions: {}\n\n",
        summary.totals.jurisdictions
    ));

    out.push_str("## Per jurisdiction\n\n");
    if summary.per_jurisdiction.is_empty() {
        out.push_str("_No activity this quarter._\n");
    } else {
        out.push_str(
            "| Jurisdiction | Miles | Gallons | Taxable gal | Due/credit gal |\n\
             |---|---:|---:|---:|---:|\n",
        );
        for row in &summary.per_jurisdiction {
            let flag = if row.low_confidence { " ⚠" } else { "" };
            out.push_str(&format!(
                "| {}{} | {:.1} | {:.2} | {} | {} |\n",
                row.jurisdiction,
                flag,
                row.miles_driven,
                row.gallons_purchased,
                opt_gallons(row.taxable_gallons),
                opt_gallons(row.gallons_due_or_credit),
            ));
        }
        out.push_str(&format!(
            "| **Total** | {:.1} | {:.2} | | |\n",
            summary.totals.miles, summary.totals.gallons
        ));
    }
    out.push('\n');

    if !summary.discrepancies.is_empty() {
        out.push_str("## Discrepancies\n\n");
        for d in &summary.discrepancies {
            let scope = d
                .jurisdiction
                .as_ref()
                .map(|j| j.to_string())
                .unwrap_or_else(|| "fleet".to_string());
            out.push_str(&format!(
                "- `{}` [{}] {}: {}\n",
                severity_label(d.severity),
                scope,
                kind_label(d),
                d.message
            ));
        }
        out.push('\n');
    }

    out
}

pub fn render_rejected_md(rejected: &[RejectedRecord]) -> String {
    let mut out = String::new();
    out.push_str("# Quarantined records\n\n");
    if rejected.is_empty() {
        out.push_str("_None._\n");
        return out;
    }

    for r in rejected {
        let id = r.record_id.as_deref().unwrap_or("-");
        let detail = r.detail.as_deref().unwrap_or("-");
        out.push_str(&format!("- `{}` `{:?}`: {}\n", id, r.reason, detail));
    }
    out
}

fn opt_gallons(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn severity_label(s: Severity) -> &'static str {
    match s {
        Severity::Info => "info",
        Severity::Warn => "warn",
        Severity::Error => "error",
    }
}

fn kind_label(d: &fueltax_types::summary::Discrepancy) -> &'static str {
    use fueltax_types::summary::DiscrepancyKind::*;
    match d.kind {
        FuelImpliedMileageGap => "fuel-implied mileage gap",
        TrackerMileageGap => "tracker mileage gap",
        MilesWithoutFuel => "miles without fuel",
        FuelWithoutMiles => "fuel without miles",
    }
}
