// Health sample domain models
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const METERS_PER_MILE: f64 = 1609.34;
const METERS_PER_KILOMETER: f64 = 1000.0;

/// Health metrics the sample source can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Step count per day.
    Steps,
    /// Walking and running distance in meters.
    Distance,
    /// Time asleep in seconds.
    Sleep,
    /// Screen usage in minutes, as summarized by the screen-time monitor.
    ScreenTime,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Steps,
        Metric::Distance,
        Metric::Sleep,
        Metric::ScreenTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Distance => "distance",
            Metric::Sleep => "sleep",
            Metric::ScreenTime => "screen_time",
        }
    }

    /// Convert a raw stored value into the unit shown to the user.
    pub fn to_display(&self, raw: f64, imperial: bool) -> f64 {
        match self {
            Metric::Steps => raw,
            Metric::Distance => DistanceUnit::preferred(imperial).from_meters(raw),
            Metric::Sleep => raw / 3600.0,
            Metric::ScreenTime => raw / 60.0,
        }
    }

    /// Label for a value produced by [`Metric::to_display`].
    pub fn display_unit(&self, imperial: bool) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Distance => DistanceUnit::preferred(imperial).plural(),
            Metric::Sleep | Metric::ScreenTime => "hours",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steps" => Ok(Metric::Steps),
            "distance" => Ok(Metric::Distance),
            "sleep" => Ok(Metric::Sleep),
            "screen_time" | "screentime" => Ok(Metric::ScreenTime),
            other => Err(format!("unknown metric: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn preferred(imperial: bool) -> Self {
        if imperial {
            DistanceUnit::Miles
        } else {
            DistanceUnit::Kilometers
        }
    }

    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Miles => meters / METERS_PER_MILE,
            DistanceUnit::Kilometers => meters / METERS_PER_KILOMETER,
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "miles",
            DistanceUnit::Kilometers => "kilometers",
        }
    }
}

/// One day's total for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub value: f64,
}

impl DailySample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A dated value ready for charting: a day total or a period average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<DailySample> for SeriesPoint {
    fn from(sample: DailySample) -> Self {
        Self::new(sample.date, sample.value)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, returning `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Split the range at calendar-year boundaries, oldest first.
    pub fn split_by_year(&self) -> Vec<DateRange> {
        let mut parts = Vec::new();
        let mut cursor = self.start;
        while cursor <= self.end {
            let year_end = NaiveDate::from_ymd_opt(cursor.year(), 12, 31).unwrap_or(self.end);
            let end = year_end.min(self.end);
            parts.push(DateRange { start: cursor, end });
            match end.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }
        parts
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Number of days in the given calendar year.
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}
