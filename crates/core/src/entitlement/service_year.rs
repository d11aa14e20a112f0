//! Year-of-service bands.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::EntitlementError;

/// Four years in days; `floor(days / 365.25) == (4 * days) / 1461`.
const DAYS_PER_FOUR_YEARS: i64 = 1461;

/// An employee's year of service, always within `1..=50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ServiceYear(u8);

impl ServiceYear {
    /// First band.
    pub const FIRST: Self = Self(1);
    /// Last band.
    pub const LAST: Self = Self(50);
    /// Number of bands.
    pub const COUNT: usize = 50;

    /// Creates a band, rejecting values outside `1..=50`.
    pub fn new(year: i64) -> Result<Self, EntitlementError> {
        if (1..=i64::from(Self::LAST.0)).contains(&year) {
            // range checked above
            Ok(Self(u8::try_from(year).unwrap_or(1)))
        } else {
            Err(EntitlementError::ServiceYearOutOfRange(year))
        }
    }

    /// Creates a band, clamping out-of-range values into `1..=50`.
    #[must_use]
    pub fn clamped(year: i64) -> Self {
        let bounded = year.clamp(1, i64::from(Self::LAST.0));
        Self(u8::try_from(bounded).unwrap_or(1))
    }

    /// Resolves the band for an employee who joined on `join_date`, as of `reference`.
    ///
    /// No join date, or a join date after `reference`, is year 1. Otherwise
    /// elapsed whole years use 365.25 days per year, plus one, clamped to 50.
    #[must_use]
    pub fn resolve(join_date: Option<NaiveDate>, reference: NaiveDate) -> Self {
        let Some(joined) = join_date else {
            return Self::FIRST;
        };
        if joined > reference {
            return Self::FIRST;
        }
        let elapsed_days = (reference - joined).num_days();
        Self::clamped(elapsed_days * 4 / DAYS_PER_FOUR_YEARS + 1)
    }

    /// The band number, 1..=50.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into a 50-slot table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// The preceding band, or `None` for year 1.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        if self.0 > 1 { Some(Self(self.0 - 1)) } else { None }
    }

    /// Every band from 1 through `self`, ascending.
    pub fn up_to(self) -> impl Iterator<Item = Self> {
        (1..=self.0).map(Self)
    }

    /// All fifty bands, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::LAST.up_to()
    }
}

impl TryFrom<i64> for ServiceYear {
    type Error = EntitlementError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceYear> for i64 {
    fn from(year: ServiceYear) -> Self {
        Self::from(year.0)
    }
}

impl fmt::Display for ServiceYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceYear {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year: i64 = s
            .trim()
            .parse()
            .map_err(|_| EntitlementError::InvalidTableConfig(format!("bad year key '{s}'")))?;
        Self::new(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 6, 1), date(2024, 6, 1), 1)]
    #[case(date(2024, 6, 1), date(2025, 5, 31), 1)]
    #[case(date(2024, 6, 1), date(2025, 6, 1), 1)]
    #[case(date(2024, 6, 1), date(2025, 6, 2), 2)]
    #[case(date(2020, 1, 1), date(2024, 6, 1), 5)]
    #[case(date(2020, 1, 1), date(2024, 1, 1), 5)]
    #[case(date(2020, 1, 1), date(2023, 12, 31), 4)]
    #[case(date(1950, 1, 1), date(2024, 1, 1), 50)]
    fn test_resolve(#[case] joined: NaiveDate, #[case] reference: NaiveDate, #[case] expected: u8) {
        assert_eq!(ServiceYear::resolve(Some(joined), reference).get(), expected);
    }

    #[test]
    fn test_resolve_without_join_date_is_first_year() {
        assert_eq!(ServiceYear::resolve(None, date(2024, 1, 1)), ServiceYear::FIRST);
    }

    #[test]
    fn test_resolve_future_join_date_is_first_year() {
        assert_eq!(
            ServiceYear::resolve(Some(date(2030, 1, 1)), date(2024, 1, 1)),
            ServiceYear::FIRST
        );
    }

    #[test]
    fn test_new_rejects_out_of_band() {
        assert_eq!(ServiceYear::new(0), Err(EntitlementError::ServiceYearOutOfRange(0)));
        assert_eq!(ServiceYear::new(51), Err(EntitlementError::ServiceYearOutOfRange(51)));
        assert_eq!(ServiceYear::new(50).map(ServiceYear::get), Ok(50));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(ServiceYear::clamped(-3), ServiceYear::FIRST);
        assert_eq!(ServiceYear::clamped(120), ServiceYear::LAST);
        assert_eq!(ServiceYear::clamped(7).get(), 7);
    }

    #[test]
    fn test_navigation() {
        assert_eq!(ServiceYear::FIRST.previous(), None);
        assert_eq!(ServiceYear::clamped(3).previous(), Some(ServiceYear::clamped(2)));
        assert_eq!(ServiceYear::clamped(3).up_to().count(), 3);
        assert_eq!(ServiceYear::all().count(), ServiceYear::COUNT);
        assert_eq!(ServiceYear::LAST.index(), 49);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("12".parse::<ServiceYear>().map(ServiceYear::get), Ok(12));
        assert!("0".parse::<ServiceYear>().is_err());
        assert!("abc".parse::<ServiceYear>().is_err());
    }
}
