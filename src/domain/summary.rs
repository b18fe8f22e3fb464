// Period rollup domain models
use super::sample::DailySample;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Year,
}

/// Aggregated statistics over one day, week, month or year.
///
/// `max_day` and `min_day` are `None` exactly when `sample_count` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period_kind: PeriodKind,
    pub period_start: NaiveDate,
    pub total_value: f64,
    pub sample_count: usize,
    pub average_value: f64,
    pub max_day: Option<DailySample>,
    pub min_day: Option<DailySample>,
}

impl PeriodSummary {
    pub fn for_day(sample: DailySample) -> Self {
        let mut acc = PeriodAccumulator::new(PeriodKind::Day, sample.date);
        acc.push(sample);
        acc.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Average over the days that have data, `None` for an empty period.
    pub fn average(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.average_value)
    }
}

/// Running sum/count/max/min for one period.
///
/// The first sample seeds both extremes; later samples replace them only on
/// strictly greater (max) or strictly smaller (min) values, so ties keep the
/// earliest day.
#[derive(Debug, Clone)]
pub struct PeriodAccumulator {
    kind: PeriodKind,
    start: NaiveDate,
    sum: f64,
    count: usize,
    max: Option<DailySample>,
    min: Option<DailySample>,
}

impl PeriodAccumulator {
    pub fn new(kind: PeriodKind, start: NaiveDate) -> Self {
        Self {
            kind,
            start,
            sum: 0.0,
            count: 0,
            max: None,
            min: None,
        }
    }

    pub fn push(&mut self, sample: DailySample) {
        self.sum += sample.value;
        self.count += 1;

        match self.max {
            Some(current) if sample.value <= current.value => {}
            _ => self.max = Some(sample),
        }
        match self.min {
            Some(current) if sample.value >= current.value => {}
            _ => self.min = Some(sample),
        }
    }

    /// Compute the average once, after every sample has been pushed.
    pub fn finish(self) -> PeriodSummary {
        let average_value = if self.count > 0 {
            self.sum / self.count as f64
        } else {
            0.0
        };

        PeriodSummary {
            period_kind: self.kind,
            period_start: self.start,
            total_value: self.sum,
            sample_count: self.count,
            average_value,
            max_day: self.max,
            min_day: self.min,
        }
    }
}

/// Every rollup for one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearBucket {
    pub year: i32,
    pub summary: PeriodSummary,
    /// Always twelve entries, January first.
    pub monthly: Vec<PeriodSummary>,
    /// One entry per week of the year, 52 or 53 of them.
    pub weekly: Vec<PeriodSummary>,
    /// Days with data, ascending.
    pub daily: Vec<DailySample>,
}

impl YearBucket {
    pub fn month(&self, month: u32) -> Option<&PeriodSummary> {
        month
            .checked_sub(1)
            .and_then(|idx| self.monthly.get(idx as usize))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailySample> {
        self.daily
            .binary_search_by(|s| s.date.cmp(&date))
            .ok()
            .map(|idx| &self.daily[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(d: u32, value: f64) -> DailySample {
        DailySample::new(NaiveDate::from_ymd_opt(2024, 3, d).unwrap(), value)
    }

    #[test]
    fn test_first_sample_seeds_both_extremes() {
        let mut acc = PeriodAccumulator::new(PeriodKind::Month, sample(1, 0.0).date);
        acc.push(sample(1, 500.0));
        let summary = acc.finish();
        assert_eq!(summary.max_day, Some(sample(1, 500.0)));
        assert_eq!(summary.min_day, Some(sample(1, 500.0)));
        assert_eq!(summary.average_value, 500.0);
    }

    #[test]
    fn test_ties_keep_earliest_day() {
        let mut acc = PeriodAccumulator::new(PeriodKind::Month, sample(1, 0.0).date);
        acc.push(sample(1, 300.0));
        acc.push(sample(2, 300.0));
        acc.push(sample(3, 100.0));
        acc.push(sample(4, 100.0));
        let summary = acc.finish();
        assert_eq!(summary.max_day.unwrap().date, sample(1, 0.0).date);
        assert_eq!(summary.min_day.unwrap().date, sample(3, 0.0).date);
    }

    #[test]
    fn test_empty_period_has_no_extremes() {
        let acc = PeriodAccumulator::new(PeriodKind::Week, sample(1, 0.0).date);
        let summary = acc.finish();
        assert!(summary.is_empty());
        assert_eq!(summary.average_value, 0.0);
        assert_eq!(summary.average(), None);
        assert!(summary.max_day.is_none());
        assert!(summary.min_day.is_none());
    }

    #[test]
    fn test_average_between_extremes() {
        let mut acc = PeriodAccumulator::new(PeriodKind::Month, sample(1, 0.0).date);
        for (d, v) in [(1, 4000.0), (2, 12000.0), (3, 8000.0)] {
            acc.push(sample(d, v));
        }
        let summary = acc.finish();
        assert_eq!(summary.total_value, 24000.0);
        assert_eq!(summary.average_value, 8000.0);
        assert!(summary.min_day.unwrap().value <= summary.average_value);
        assert!(summary.average_value <= summary.max_day.unwrap().value);
    }

    #[test]
    fn test_day_summary() {
        let summary = PeriodSummary::for_day(sample(9, 42.0));
        assert_eq!(summary.period_kind, PeriodKind::Day);
        assert_eq!(summary.period_start, sample(9, 0.0).date);
        assert_eq!(summary.sample_count, 1);
    }
}
