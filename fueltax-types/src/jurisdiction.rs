use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved code for blank or unrecognized jurisdiction inputs.
///
/// Unknown inputs normalize to this code rather than being dropped, so
/// their miles and gallons still show up in the report for audit.
pub const UNKNOWN: &str = "UNKNOWN";

/// IFTA member jurisdictions: the 48 contiguous US states and the 10
/// Canadian provinces.
const IFTA_MEMBERS: &[&str] = &[
    // US states
    "AL", "AR", "AZ", "CA", "CO", "CT", "DE", "FL", "GA", "IA", "ID", "IL", "IN", "KS", "KY",
    "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM",
    "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VT", "WA",
    "WI", "WV", "WY",
    // Canadian provinces
    "AB", "BC", "MB", "NB", "NL", "NS", "ON", "PE", "QC", "SK",
];

/// Canonical short code for a taxing jurisdiction (state/province).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JurisdictionCode(String);

impl JurisdictionCode {
    /// Normalize a raw input into a canonical code.
    ///
    /// Trims and uppercases; anything blank or outside the IFTA member
    /// set becomes [`UNKNOWN`].
    pub fn normalize(input: &str) -> Self {
        let code = input.trim().to_ascii_uppercase();
        if IFTA_MEMBERS.contains(&code.as_str()) {
            Self(code)
        } else {
            Self::unknown()
        }
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN
    }
}

impl fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
