use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A fixed three-month IFTA reporting period, serialized as `"YYYY-Qn"`.
///
/// Construction goes through [`Quarter::new`] or [`FromStr`], so a value
/// in hand always satisfies `number ∈ 1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    number: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuarterParseError {
    #[error("quarter must have the shape YYYY-Qn, got {0:?}")]
    Shape(String),

    #[error("quarter number must be between 1 and 4, got {0}")]
    Number(u8),

    #[error("quarter year {0} is outside the supported range")]
    Year(i32),
}

impl Quarter {
    pub fn new(year: i32, number: u8) -> Result<Self, QuarterParseError> {
        if !(1..=4).contains(&number) {
            return Err(QuarterParseError::Number(number));
        }
        if !(1900..=9999).contains(&year) {
            return Err(QuarterParseError::Year(year));
        }
        Ok(Self { year, number })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Inclusive calendar boundaries of the quarter.
    ///
    /// Q1 = Jan 1 – Mar 31, Q2 = Apr 1 – Jun 30,
    /// Q3 = Jul 1 – Sep 30, Q4 = Oct 1 – Dec 31.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let (start_month, end_month, end_day) = match self.number {
            1 => (1, 3, 31),
            2 => (4, 6, 30),
            3 => (7, 9, 30),
            _ => (10, 12, 31),
        };
        // Year and month are range-checked at construction, so these
        // calendar dates always exist.
        let start = NaiveDate::from_ymd_opt(self.year, start_month, 1)
            .expect("quarter start date is a valid calendar date");
        let end = NaiveDate::from_ymd_opt(self.year, end_month, end_day)
            .expect("quarter end date is a valid calendar date");
        (start, end)
    }

    /// True when `date` falls inside the quarter, boundaries included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = self.date_range();
        start <= date && date <= end
    }
}

impl FromStr for Quarter {
    type Err = QuarterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let shape_err = || QuarterParseError::Shape(s.to_string());

        let (year_part, quarter_part) = s.split_once('-').ok_or_else(shape_err)?;
        if year_part.len() != 4 {
            return Err(shape_err());
        }
        let year: i32 = year_part.parse().map_err(|_| shape_err())?;

        let digits = quarter_part.strip_prefix('Q').ok_or_else(shape_err)?;
        // Exactly one digit after the Q: u8 parsing alone would also
        // admit "01" and "+1".
        let number = match digits.as_bytes() {
            [d] if d.is_ascii_digit() => d - b'0',
            _ => return Err(shape_err()),
        };

        Quarter::new(year, number)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.number)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quarter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_strict_shape() {
        let q: Quarter = "2025-Q1".parse().expect("parse");
        assert_eq!(q.year(), 2025);
        assert_eq!(q.number(), 1);
        assert_eq!(q.to_string(), "2025-Q1");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in [
            "", "2025", "2025-Q5", "2025-Q0", "2025-q1", "25-Q1", "2025-Q", "2025Q1", "2025-Q01",
            "2025-Q+1",
        ] {
            assert!(bad.parse::<Quarter>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn rejects_out_of_range_numbers_via_constructor() {
        assert_eq!(
            Quarter::new(2025, 5).unwrap_err(),
            QuarterParseError::Number(5)
        );
        assert_eq!(
            Quarter::new(123, 1).unwrap_err(),
            QuarterParseError::Year(123)
        );
    }

    #[test]
    fn date_ranges_cover_the_calendar_year() {
        let ranges: Vec<_> = (1..=4)
            .map(|n| Quarter::new(2025, n).expect("quarter").date_range())
            .collect();

        assert_eq!(ranges[0].0, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(ranges[0].1, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(ranges[1].0, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(ranges[1].1, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert_eq!(ranges[2].0, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(ranges[2].1, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
        assert_eq!(ranges[3].0, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(ranges[3].1, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn contains_is_boundary_inclusive() {
        let q: Quarter = "2025-Q2".parse().expect("parse");
        assert!(q.contains(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
        assert!(q.contains(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
        assert!(!q.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(!q.contains(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    }

    #[test]
    fn orders_by_year_then_number() {
        let a: Quarter = "2024-Q4".parse().unwrap();
        let b: Quarter = "2025-Q1".parse().unwrap();
        let c: Quarter = "2025-Q3".parse().unwrap();
        assert!(a < b && b < c);
    }
}
