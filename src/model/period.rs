use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The time-bucketing mode of a spending report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One bucket per month across the whole journal.
    AllTime,
    /// One bucket per day of the reference month.
    Daily,
    /// Four 7-day buckets starting on the first of the reference month.
    Weekly,
    /// One bucket per month across the whole journal, scoped to the reference month for summaries.
    #[default]
    Monthly,
}

serde_plain::derive_display_from_serialize!(Granularity);
serde_plain::derive_fromstr_from_deserialize!(Granularity);

impl Granularity {
    /// Whether this granularity needs a reference month to enumerate its periods.
    pub fn needs_reference(&self) -> bool {
        matches!(self, Granularity::Daily | Granularity::Weekly)
    }
}

/// A month and year that scopes the `Daily` and `Weekly` granularities.
///
/// The month is zero-based (`0` is January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferencePeriod {
    month: u32,
    year: i32,
}

impl ReferencePeriod {
    /// Returns `None` if `month` is not in `0..=11` or the year is outside chrono's range.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.checked_add(1)?, 1)?;
        Some(Self { month, year })
    }

    /// The reference period that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month0(),
            year: date.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The first calendar day of the reference month.
    pub fn first_day(&self) -> NaiveDate {
        // Validated in the constructors.
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).unwrap_or_default()
    }

    /// True if `date` falls in the reference month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month0() == self.month && date.year() == self.year
    }
}

impl std::fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first_day().format("%B %Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_granularity_text_forms() {
        assert_eq!(Granularity::AllTime.to_string(), "all-time");
        assert_eq!(Granularity::from_str("weekly").unwrap(), Granularity::Weekly);
        assert!(Granularity::from_str("yearly").is_err());
    }

    #[test]
    fn test_reference_period_bounds() {
        assert!(ReferencePeriod::new(0, 2024).is_some());
        assert!(ReferencePeriod::new(11, 2024).is_some());
        assert!(ReferencePeriod::new(12, 2024).is_none());
    }

    #[test]
    fn test_reference_period_contains() {
        let feb = ReferencePeriod::new(1, 2024).unwrap();
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(feb.to_string(), "February 2024");
    }
}
