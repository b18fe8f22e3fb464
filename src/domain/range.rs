// Relative time windows offered to the user
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    FiveYears,
    AllTime,
}

/// Point density produced for a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl TimeRange {
    pub const ALL: [TimeRange; 8] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::YearToDate,
        TimeRange::OneYear,
        TimeRange::FiveYears,
        TimeRange::AllTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "1W",
            TimeRange::Month => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::YearToDate => "YTD",
            TimeRange::OneYear => "1Y",
            TimeRange::FiveYears => "5Y",
            TimeRange::AllTime => "ALL",
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            TimeRange::Week | TimeRange::Month => Granularity::Daily,
            TimeRange::ThreeMonths
            | TimeRange::SixMonths
            | TimeRange::YearToDate
            | TimeRange::OneYear => Granularity::Weekly,
            TimeRange::FiveYears | TimeRange::AllTime => Granularity::Monthly,
        }
    }

    /// First day included in the window ending at `now`, `None` for all time.
    ///
    /// Both ends are inclusive, so a week is `now` and the six days before it.
    pub fn start_date(&self, now: NaiveDate) -> Option<NaiveDate> {
        let back = match self {
            TimeRange::Week => now.checked_sub_days(Days::new(7)),
            TimeRange::Month => now.checked_sub_months(Months::new(1)),
            TimeRange::ThreeMonths => now.checked_sub_months(Months::new(3)),
            TimeRange::SixMonths => now.checked_sub_months(Months::new(6)),
            TimeRange::YearToDate => return NaiveDate::from_ymd_opt(now.year(), 1, 1),
            TimeRange::OneYear => now.checked_sub_months(Months::new(12)),
            TimeRange::FiveYears => now.checked_sub_months(Months::new(60)),
            TimeRange::AllTime => return None,
        };
        back.and_then(|d| d.succ_opt())
    }

    /// Days of history required before the range is worth offering.
    pub fn minimum_span_days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::YearToDate => 1,
            TimeRange::OneYear => 365,
            TimeRange::FiveYears => 5 * 365,
            TimeRange::AllTime => 0,
        }
    }

    /// Whether enough history exists to populate the range.
    pub fn is_available(&self, earliest_sample: Option<NaiveDate>, now: NaiveDate) -> bool {
        if *self == TimeRange::AllTime {
            return true;
        }
        match earliest_sample {
            Some(earliest) => (now - earliest).num_days() >= self.minimum_span_days(),
            None => false,
        }
    }

    /// Ranges that can be offered given the earliest recorded sample.
    pub fn available(earliest_sample: Option<NaiveDate>, now: NaiveDate) -> Vec<TimeRange> {
        Self::ALL
            .into_iter()
            .filter(|range| range.is_available(earliest_sample, now))
            .collect()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" | "1w" => Ok(TimeRange::Week),
            "month" | "1m" => Ok(TimeRange::Month),
            "three_months" | "3m" => Ok(TimeRange::ThreeMonths),
            "six_months" | "6m" => Ok(TimeRange::SixMonths),
            "year_to_date" | "ytd" => Ok(TimeRange::YearToDate),
            "one_year" | "1y" => Ok(TimeRange::OneYear),
            "five_years" | "5y" => Ok(TimeRange::FiveYears),
            "all_time" | "all" => Ok(TimeRange::AllTime),
            other => Err(format!("unknown time range: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_dates() {
        let now = day(2024, 3, 31);
        assert_eq!(TimeRange::Week.start_date(now), Some(day(2024, 3, 25)));
        // Month arithmetic clamps to the end of shorter months.
        assert_eq!(TimeRange::Month.start_date(now), Some(day(2024, 3, 1)));
        assert_eq!(TimeRange::ThreeMonths.start_date(now), Some(day(2024, 1, 1)));
        assert_eq!(TimeRange::SixMonths.start_date(now), Some(day(2023, 10, 1)));
        assert_eq!(TimeRange::YearToDate.start_date(now), Some(day(2024, 1, 1)));
        assert_eq!(TimeRange::OneYear.start_date(now), Some(day(2023, 4, 1)));
        assert_eq!(TimeRange::FiveYears.start_date(now), Some(day(2019, 4, 1)));
        assert_eq!(TimeRange::AllTime.start_date(now), None);
    }

    #[test]
    fn test_windows_cover_whole_periods() {
        let now = day(2025, 6, 30);
        let days = |range: TimeRange| (now - range.start_date(now).unwrap()).num_days() + 1;
        assert_eq!(days(TimeRange::Week), 7);
        // 31 May through 30 June
        assert_eq!(days(TimeRange::Month), 31);
        assert_eq!(days(TimeRange::OneYear), 365);
    }

    #[test]
    fn test_granularity_tiers() {
        assert_eq!(TimeRange::Week.granularity(), Granularity::Daily);
        assert_eq!(TimeRange::Month.granularity(), Granularity::Daily);
        assert_eq!(TimeRange::ThreeMonths.granularity(), Granularity::Weekly);
        assert_eq!(TimeRange::YearToDate.granularity(), Granularity::Weekly);
        assert_eq!(TimeRange::OneYear.granularity(), Granularity::Weekly);
        assert_eq!(TimeRange::FiveYears.granularity(), Granularity::Monthly);
        assert_eq!(TimeRange::AllTime.granularity(), Granularity::Monthly);
    }

    #[test]
    fn test_availability() {
        let now = day(2024, 6, 1);
        assert!(TimeRange::AllTime.is_available(None, now));
        assert!(!TimeRange::Week.is_available(None, now));

        let earliest = Some(day(2024, 5, 1));
        assert!(TimeRange::Week.is_available(earliest, now));
        assert!(TimeRange::Month.is_available(earliest, now));
        assert!(!TimeRange::ThreeMonths.is_available(earliest, now));

        assert_eq!(
            TimeRange::available(earliest, now),
            vec![TimeRange::Week, TimeRange::Month, TimeRange::YearToDate, TimeRange::AllTime]
        );
    }

    #[test]
    fn test_parse_range() {
        assert_eq!("ytd".parse::<TimeRange>().unwrap(), TimeRange::YearToDate);
        assert_eq!("five_years".parse::<TimeRange>().unwrap(), TimeRange::FiveYears);
        assert!("decade".parse::<TimeRange>().is_err());
    }
}
