//! Fleet fuel economy.

use fueltax_types::summary::JurisdictionTotals;

/// Average miles per gallon over a set of jurisdiction totals.
///
/// Returns `None` when no gallons were purchased: economy is not
/// determinable and callers must not divide by it. Never returns
/// `NaN` or infinity.
///
/// Computed once at fleet level for the filtered scope; handing in a
/// single vehicle's totals yields that vehicle's economy.
pub fn fleet_mpg<'a, I>(totals: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a JurisdictionTotals>,
{
    let (mut miles, mut gallons) = (0.0_f64, 0.0_f64);
    for t in totals {
        miles += t.miles_driven;
        gallons += t.gallons_purchased;
    }
    if gallons > 0.0 {
        Some(miles / gallons)
    } else {
        None
    }
}
