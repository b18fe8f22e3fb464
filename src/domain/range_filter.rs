// Range filter - selects a window and re-aggregates it to the right density
use super::range::{Granularity, TimeRange};
use super::sample::SeriesPoint;
use super::summary::YearBucket;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Turns year buckets into the point sequence for one time range.
///
/// Short ranges keep one point per day with data. Longer ranges regroup the
/// flattened daily sequence into calendar weeks or months and emit one
/// averaged point per group, dated at the group's first calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFilter {
    week_start: Weekday,
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
        }
    }
}

impl RangeFilter {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn select(
        &self,
        buckets: &BTreeMap<i32, YearBucket>,
        range: TimeRange,
        now: NaiveDate,
    ) -> Vec<SeriesPoint> {
        let start = range.start_date(now);
        let daily = daily_points(buckets, start, now);

        let mut points = match range.granularity() {
            Granularity::Daily => daily,
            Granularity::Weekly => self.weekly_averages(&daily),
            Granularity::Monthly => monthly_averages(&daily),
        };
        // A leading group may begin before the window; date it at the window start.
        if let (Some(start), Some(first)) = (start, points.first_mut()) {
            first.date = first.date.max(start);
        }
        points
    }

    pub fn weekly_averages(&self, daily: &[SeriesPoint]) -> Vec<SeriesPoint> {
        group_averages(daily, |date| self.start_of_week(date))
    }

    /// The configured first weekday on or before `date`.
    pub fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        date.checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(date)
    }
}

pub fn monthly_averages(daily: &[SeriesPoint]) -> Vec<SeriesPoint> {
    group_averages(daily, |date| date.with_day(1).unwrap_or(date))
}

/// Flatten the daily samples of every bucket inside `[start, end]`.
pub fn daily_points(
    buckets: &BTreeMap<i32, YearBucket>,
    start: Option<NaiveDate>,
    end: NaiveDate,
) -> Vec<SeriesPoint> {
    let first_year = start.map(|d| d.year()).unwrap_or(i32::MIN);

    buckets
        .range(first_year..=end.year())
        .flat_map(|(_, bucket)| bucket.daily.iter())
        .filter(|s| start.is_none_or(|start| s.date >= start) && s.date <= end)
        .map(|s| SeriesPoint::from(*s))
        .collect()
}

/// Average consecutive points that share a group key; input must be sorted.
fn group_averages<F>(points: &[SeriesPoint], group_of: F) -> Vec<SeriesPoint>
where
    F: Fn(NaiveDate) -> NaiveDate,
{
    let mut grouped = Vec::new();
    let mut current: Option<(NaiveDate, f64, usize)> = None;

    for point in points {
        let key = group_of(point.date);
        match current.as_mut() {
            Some((group, sum, count)) if *group == key => {
                *sum += point.value;
                *count += 1;
            }
            _ => {
                if let Some((group, sum, count)) = current.take() {
                    grouped.push(SeriesPoint::new(group, sum / count as f64));
                }
                current = Some((key, point.value, 1));
            }
        }
    }

    if let Some((group, sum, count)) = current {
        grouped.push(SeriesPoint::new(group, sum / count as f64));
    }

    grouped
}
