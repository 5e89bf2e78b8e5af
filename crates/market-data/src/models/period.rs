use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Fixed set of chart durations offered by the report request.
///
/// Mirrors the period selector of the dashboard: `1mo` through `5y`, plus
/// `ytd` which anchors the window to January 1st of the current year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl Default for Period {
    fn default() -> Self {
        Self::YearToDate
    }
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
        }
    }

    /// Start of the window ending at `end`.
    pub fn start_from(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
            Self::FiveYears => 60,
            Self::YearToDate => {
                return Utc
                    .with_ymd_and_hms(end.year(), 1, 1, 0, 0, 0)
                    .single()
                    .unwrap_or(end);
            }
        };
        end.checked_sub_months(Months::new(months)).unwrap_or(end)
    }
}

/// Inclusive date range for historical fetches.
///
/// An explicit range from the request wins over a period; a period is
/// resolved against "now" at request time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Resolve a period into a concrete range ending at `end`.
    pub fn from_period(period: Period, end: DateTime<Utc>) -> Self {
        Self {
            start: period.start_from(end),
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_round_trip_serde() {
        for period in [
            Period::OneMonth,
            Period::ThreeMonths,
            Period::SixMonths,
            Period::OneYear,
            Period::TwoYears,
            Period::FiveYears,
            Period::YearToDate,
        ] {
            let json = serde_json::to_string(&period).unwrap();
            assert_eq!(json, format!("\"{}\"", period.as_str()));
            let back: Period = serde_json::from_str(&json).unwrap();
            assert_eq!(back, period);
        }
    }

    #[test]
    fn test_year_to_date_anchors_to_january_first() {
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let start = Period::YearToDate.start_from(end);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_one_year_window() {
        let end = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let range = DateRange::from_period(Period::OneYear, end);
        assert_eq!(
            range.start,
            Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(range.end, end);
    }
}
