// Aggregator - buckets daily samples into per-year rollups
use super::sample::DailySample;
use super::summary::{PeriodAccumulator, PeriodKind, YearBucket};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Collapses raw samples into daily totals and rolls them up per year.
///
/// Samples may arrive in any order and several may share a day; they are
/// summed into one [`DailySample`] per date before any rollup happens.
/// Samples dated after the anchor, negative values and non-finite values
/// are dropped.
#[derive(Debug, Clone)]
pub struct Aggregator {
    anchor: NaiveDate,
    days: BTreeMap<NaiveDate, f64>,
    discarded: usize,
}

impl Aggregator {
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            days: BTreeMap::new(),
            discarded: 0,
        }
    }

    pub fn push(&mut self, sample: DailySample) {
        if sample.date > self.anchor {
            tracing::debug!("Dropping sample dated {} after anchor {}", sample.date, self.anchor);
            self.discarded += 1;
            return;
        }
        if !sample.value.is_finite() || sample.value < 0.0 {
            tracing::warn!("Dropping invalid sample value {} on {}", sample.value, sample.date);
            self.discarded += 1;
            return;
        }
        *self.days.entry(sample.date).or_insert(0.0) += sample.value;
    }

    pub fn extend<I: IntoIterator<Item = DailySample>>(&mut self, samples: I) {
        for sample in samples {
            self.push(sample);
        }
    }

    /// Number of samples rejected so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn finish(self) -> BTreeMap<i32, YearBucket> {
        let mut buckets = BTreeMap::new();
        let mut current: Option<YearAccumulator> = None;

        for (date, value) in self.days {
            let sample = DailySample::new(date, value);
            match current.as_mut() {
                Some(acc) if acc.year == date.year() => acc.push(sample),
                _ => {
                    if let Some(done) = current.take() {
                        buckets.insert(done.year, done.finish());
                    }
                    let mut acc = YearAccumulator::new(date.year());
                    acc.push(sample);
                    current = Some(acc);
                }
            }
        }

        if let Some(done) = current {
            buckets.insert(done.year, done.finish());
        }

        buckets
    }
}

/// Aggregate a batch of samples, ignoring anything after `anchor`.
pub fn aggregate<I>(samples: I, anchor: NaiveDate) -> BTreeMap<i32, YearBucket>
where
    I: IntoIterator<Item = DailySample>,
{
    let mut aggregator = Aggregator::new(anchor);
    aggregator.extend(samples);
    aggregator.finish()
}

/// Accumulates one calendar year; samples must arrive in date order.
#[derive(Debug, Clone)]
struct YearAccumulator {
    year: i32,
    year_total: PeriodAccumulator,
    monthly: Vec<PeriodAccumulator>,
    weekly: Vec<PeriodAccumulator>,
    daily: Vec<DailySample>,
}

impl YearAccumulator {
    fn new(year: i32) -> Self {
        let jan_first = first_of_year(year);

        let monthly = (1..=12)
            .map(|m| {
                let start = NaiveDate::from_ymd_opt(year, m, 1).unwrap_or(jan_first);
                PeriodAccumulator::new(PeriodKind::Month, start)
            })
            .collect();

        let weekly = (1..=weeks_in_year(year))
            .map(|w| PeriodAccumulator::new(PeriodKind::Week, week_start(year, w)))
            .collect();

        Self {
            year,
            year_total: PeriodAccumulator::new(PeriodKind::Year, jan_first),
            monthly,
            weekly,
            daily: Vec::with_capacity(366),
        }
    }

    fn push(&mut self, sample: DailySample) {
        debug_assert_eq!(sample.date.year(), self.year);

        self.year_total.push(sample);
        self.monthly[sample.date.month0() as usize].push(sample);
        let week = week_of_year(sample.date) as usize;
        if let Some(acc) = self.weekly.get_mut(week - 1) {
            acc.push(sample);
        }
        self.daily.push(sample);
    }

    fn finish(self) -> YearBucket {
        YearBucket {
            year: self.year,
            summary: self.year_total.finish(),
            monthly: self.monthly.into_iter().map(PeriodAccumulator::finish).collect(),
            weekly: self.weekly.into_iter().map(PeriodAccumulator::finish).collect(),
            daily: self.daily,
        }
    }
}

fn first_of_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Number of ISO weeks in `year`; 28 December always sits in the last one.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// ISO week number folded into the date's own calendar year.
///
/// Early-January days that belong to the previous ISO year count as week 1,
/// late-December days that belong to the next ISO year count as the last week.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let iso = date.iso_week();
    if iso.year() < date.year() {
        1
    } else if iso.year() > date.year() {
        weeks_in_year(date.year())
    } else {
        iso.week()
    }
}

/// First day of week `week` clipped to the calendar year. Week 1 always
/// starts on 1 January since it absorbs the days of the previous ISO year.
fn week_start(year: i32, week: u32) -> NaiveDate {
    let jan_first = first_of_year(year);
    if week <= 1 {
        return jan_first;
    }
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .map(|monday| monday.max(jan_first))
        .unwrap_or(jan_first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_buckets_by_year() {
        let samples = vec![
            DailySample::new(day(2023, 12, 31), 100.0),
            DailySample::new(day(2024, 1, 1), 200.0),
            DailySample::new(day(2024, 6, 15), 300.0),
        ];
        let buckets = aggregate(samples, day(2024, 12, 31));

        assert_eq!(buckets.keys().copied().collect::<Vec<_>>(), vec![2023, 2024]);
        assert_eq!(buckets[&2023].summary.total_value, 100.0);
        assert_eq!(buckets[&2024].summary.total_value, 500.0);
        assert_eq!(buckets[&2024].daily.len(), 2);
    }

    #[test]
    fn test_same_day_samples_are_summed() {
        let samples = vec![
            DailySample::new(day(2024, 3, 1), 1000.0),
            DailySample::new(day(2024, 3, 1), 2500.0),
        ];
        let buckets = aggregate(samples, day(2024, 3, 1));
        let bucket = &buckets[&2024];
        assert_eq!(bucket.daily, vec![DailySample::new(day(2024, 3, 1), 3500.0)]);
        assert_eq!(bucket.summary.sample_count, 1);
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let samples = vec![
            DailySample::new(day(2024, 5, 3), 3.0),
            DailySample::new(day(2024, 5, 1), 1.0),
            DailySample::new(day(2024, 5, 2), 2.0),
        ];
        let buckets = aggregate(samples, day(2024, 5, 3));
        let dates: Vec<_> = buckets[&2024].daily.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![day(2024, 5, 1), day(2024, 5, 2), day(2024, 5, 3)]);
    }

    #[test]
    fn test_monthly_summaries_always_twelve() {
        let buckets = aggregate(vec![DailySample::new(day(2024, 2, 10), 10.0)], day(2024, 12, 31));
        let bucket = &buckets[&2024];
        assert_eq!(bucket.monthly.len(), 12);
        assert_eq!(bucket.month(2).unwrap().sample_count, 1);
        assert_eq!(bucket.month(2).unwrap().period_start, day(2024, 2, 1));

        let march = bucket.month(3).unwrap();
        assert!(march.is_empty());
        assert!(march.max_day.is_none());
        assert!(march.min_day.is_none());
        assert!(bucket.month(0).is_none());
        assert!(bucket.month(13).is_none());
    }

    #[test]
    fn test_weekly_summaries_cover_the_year() {
        let buckets = aggregate(vec![DailySample::new(day(2020, 7, 1), 1.0)], day(2020, 12, 31));
        // 2020 has 53 ISO weeks.
        assert_eq!(buckets[&2020].weekly.len(), 53);
        assert_eq!(buckets[&2020].weekly[0].period_start, day(2020, 1, 1));

        let buckets = aggregate(vec![DailySample::new(day(2023, 7, 1), 1.0)], day(2023, 12, 31));
        assert_eq!(buckets[&2023].weekly.len(), 52);
        assert_eq!(buckets[&2023].weekly[0].period_start, day(2023, 1, 1));
        assert_eq!(buckets[&2023].weekly[1].period_start, day(2023, 1, 9));
    }

    #[test]
    fn test_week_of_year_folds_iso_boundaries() {
        // 1 January 2021 is in ISO week 53 of 2020.
        assert_eq!(week_of_year(day(2021, 1, 1)), 1);
        // 31 December 2024 is in ISO week 1 of 2025.
        assert_eq!(week_of_year(day(2024, 12, 31)), weeks_in_year(2024));
        assert_eq!(week_of_year(day(2024, 3, 6)), 10);
    }

    #[test]
    fn test_drops_samples_after_anchor_and_invalid_values() {
        let mut aggregator = Aggregator::new(day(2024, 1, 10));
        aggregator.extend(vec![
            DailySample::new(day(2024, 1, 9), 10.0),
            DailySample::new(day(2024, 1, 11), 10.0),
            DailySample::new(day(2024, 1, 8), -4.0),
            DailySample::new(day(2024, 1, 7), f64::NAN),
        ]);
        assert_eq!(aggregator.discarded(), 3);
        assert_eq!(aggregator.day_count(), 1);
        let buckets = aggregator.finish();
        assert_eq!(buckets[&2024].summary.total_value, 10.0);
    }

    #[test]
    fn test_empty_input_yields_no_buckets() {
        assert!(aggregate(Vec::new(), day(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_leap_day_is_kept() {
        let samples: Vec<_> = day(2024, 1, 1)
            .iter_days()
            .take(366)
            .map(|d| DailySample::new(d, 1.0))
            .collect();
        let buckets = aggregate(samples, day(2024, 12, 31));
        let bucket = &buckets[&2024];
        assert_eq!(bucket.daily.len(), 366);
        assert!(bucket.day(day(2024, 2, 29)).is_some());
        assert_eq!(bucket.month(2).unwrap().sample_count, 29);
    }

    proptest! {
        #[test]
        fn prop_bucket_totals_match_daily_sum(values in proptest::collection::vec(0.0..50_000.0f64, 1..400)) {
            let start = day(2023, 1, 1);
            let samples: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(i, v)| DailySample::new(start + chrono::Duration::days(i as i64), *v))
                .collect();
            let buckets = aggregate(samples, day(2025, 1, 1));

            for bucket in buckets.values() {
                let daily_sum: f64 = bucket.daily.iter().map(|s| s.value).sum();
                prop_assert!((daily_sum - bucket.summary.total_value).abs() < 1e-6);

                let monthly_sum: f64 = bucket.monthly.iter().map(|m| m.total_value).sum();
                prop_assert!((monthly_sum - bucket.summary.total_value).abs() < 1e-6);

                let weekly_count: usize = bucket.weekly.iter().map(|w| w.sample_count).sum();
                prop_assert_eq!(weekly_count, bucket.daily.len());

                for period in bucket.monthly.iter().chain(bucket.weekly.iter()) {
                    if period.sample_count > 0 {
                        let avg = period.total_value / period.sample_count as f64;
                        prop_assert!((avg - period.average_value).abs() < 1e-9);
                        prop_assert!(period.min_day.unwrap().value <= period.average_value + 1e-9);
                        prop_assert!(period.average_value <= period.max_day.unwrap().value + 1e-9);
                    } else {
                        prop_assert!(period.max_day.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_year_summary_average() {
        let samples = vec![
            DailySample::new(day(2024, 1, 1), 3000.0),
            DailySample::new(day(2024, 1, 2), 5000.0),
        ];
        let buckets = aggregate(samples, day(2024, 1, 2));
        assert_abs_diff_eq!(buckets[&2024].summary.average_value, 4000.0);
    }
}
