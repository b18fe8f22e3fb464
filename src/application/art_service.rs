// Art service - Use case for turning raw samples into chart-ready series
use super::error::PipelineError;
use super::preference_service::UserPreferences;
use super::sample_source::{SampleSource, SourceError};
use crate::domain::aggregator::Aggregator;
use crate::domain::axis::AxisBounds;
use crate::domain::odometer::format as format_odometer;
use crate::domain::preferences::Preferences;
use crate::domain::range::TimeRange;
use crate::domain::range_filter::{RangeFilter, daily_points};
use crate::domain::sample::{DateRange, DistanceUnit, Metric, SeriesPoint};
use crate::domain::summary::YearBucket;
use crate::presentation::chart_renderer::{ChartStyle, render};
use crate::presentation::odometer_chart::{self, OdometerStyle};
use crate::presentation::radial_chart::RadialStyle;
use crate::presentation::raster::{ImageSize, RasterImage, RenderError};
use crate::presentation::ticker_chart::TickerStyle;
use crate::presentation::widget::WidgetFamily;
use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Aggregated samples for one metric over a requested window.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub metric: Metric,
    pub requested: DateRange,
    /// Requested window clipped to the recorded history, `None` when no
    /// history overlaps it.
    pub effective: Option<DateRange>,
    pub buckets: BTreeMap<i32, YearBucket>,
    pub discarded: usize,
}

impl LoadedSeries {
    fn empty(metric: Metric, requested: DateRange) -> Self {
        Self {
            metric,
            requested,
            effective: None,
            buckets: BTreeMap::new(),
            discarded: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.buckets.values().map(|b| b.summary.total_value).sum()
    }

    /// Every daily total in date order.
    pub fn daily(&self) -> Vec<SeriesPoint> {
        daily_points(&self.buckets, None, self.requested.end)
    }
}

/// Ticker chart input for one metric and time range.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerArt {
    pub metric: Metric,
    pub range: TimeRange,
    pub unit: &'static str,
    pub points: Vec<SeriesPoint>,
    pub bounds: AxisBounds,
    pub effective: Option<DateRange>,
}

impl TickerArt {
    pub fn style(&self) -> ChartStyle {
        ChartStyle::Ticker(TickerStyle {
            title: Some(format!("{} {}", title_case(self.metric.as_str()), self.range.label())),
            unit: Some(self.unit.to_string()),
            ..TickerStyle::default()
        })
    }

    pub fn render(&self, size: ImageSize) -> Result<RasterImage, RenderError> {
        render(&self.points, self.bounds, size, &self.style())
    }
}

/// Distance travelled over the preferred year span.
#[derive(Debug, Clone, PartialEq)]
pub struct OdometerArt {
    pub unit: DistanceUnit,
    pub caption: String,
    /// Daily distances in `unit`.
    pub points: Vec<SeriesPoint>,
    pub effective: Option<DateRange>,
}

impl OdometerArt {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn render(
        &self,
        size: ImageSize,
        digit_count: usize,
        fraction_digits: usize,
    ) -> Result<RasterImage, RenderError> {
        let style = OdometerStyle {
            digit_count,
            fraction_digits,
            caption: self.caption.clone(),
        };
        render(&self.points, AxisBounds::default(), size, &ChartStyle::Odometer(style))
    }

    /// The digit string shown in the grid.
    pub fn reading(&self, digit_count: usize, fraction_digits: usize) -> String {
        format_odometer(self.total(), digit_count, fraction_digits).as_string()
    }
}

/// One calendar year of daily steps for the radial chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StepArt {
    pub year: i32,
    pub points: Vec<SeriesPoint>,
    pub total_steps: f64,
    /// Mean over the days that have data.
    pub average_per_day: Option<f64>,
    pub goal: Option<f64>,
}

impl StepArt {
    pub fn render(&self, size: ImageSize) -> Result<RasterImage, RenderError> {
        let style = RadialStyle {
            goal: self.goal,
            ..RadialStyle::default()
        };
        render(&self.points, AxisBounds::default(), size, &ChartStyle::Radial(style))
    }
}

#[derive(Clone)]
pub struct ArtService {
    source: Arc<dyn SampleSource>,
    range_filter: RangeFilter,
}

impl ArtService {
    pub fn new(source: Arc<dyn SampleSource>, range_filter: RangeFilter) -> Self {
        Self {
            source,
            range_filter,
        }
    }

    async fn earliest(&self, metric: Metric) -> Result<Option<NaiveDate>, PipelineError> {
        self.source
            .earliest_sample_date(metric)
            .await
            .map_err(|source| PipelineError::SourceUnavailable { metric, source })
    }

    /// Fetch and aggregate `metric` over `window`.
    ///
    /// The window is clipped to the earliest recorded sample and fetched one
    /// calendar year at a time, concurrently. If only some years fail the
    /// result is `PipelineError::Partial` carrying what did load.
    pub async fn load(&self, metric: Metric, window: DateRange) -> Result<LoadedSeries, PipelineError> {
        let earliest = self.earliest(metric).await?;
        self.load_from(metric, window, earliest).await
    }

    async fn load_from(
        &self,
        metric: Metric,
        window: DateRange,
        earliest: Option<NaiveDate>,
    ) -> Result<LoadedSeries, PipelineError> {
        let Some(effective) = earliest.and_then(|e| DateRange::new(window.start.max(e), window.end)) else {
            tracing::debug!(%metric, %window, "no recorded history in window");
            return Ok(LoadedSeries::empty(metric, window));
        };

        let chunks = effective.split_by_year();
        tracing::debug!(%metric, %effective, chunks = chunks.len(), "fetching samples");
        let results = join_all(
            chunks
                .iter()
                .map(|chunk| self.source.fetch_samples(metric, chunk.start, chunk.end)),
        )
        .await;

        let mut aggregator = Aggregator::new(effective.end);
        let mut first_error: Option<SourceError> = None;
        let mut failures = 0;

        for (chunk, result) in chunks.iter().zip(results) {
            match result {
                Ok(samples) => aggregator.extend(samples.into_iter().filter(|s| chunk.contains(s.date))),
                Err(e) => {
                    tracing::warn!(%metric, %chunk, error = %e, "sample fetch failed");
                    failures += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        let discarded = aggregator.discarded();
        let series = LoadedSeries {
            metric,
            requested: window,
            effective: Some(effective),
            buckets: aggregator.finish(),
            discarded,
        };

        match first_error {
            None => Ok(series),
            Some(source) if failures == chunks.len() => Err(PipelineError::SourceUnavailable { metric, source }),
            Some(source) => Err(PipelineError::Partial {
                metric,
                partial: Box::new(series),
                source,
            }),
        }
    }

    /// Points, axis bounds and unit for a time-range ticker, in display units.
    pub async fn ticker(
        &self,
        metric: Metric,
        range: TimeRange,
        imperial: bool,
        today: NaiveDate,
    ) -> Result<TickerArt, PipelineError> {
        let earliest = self.earliest(metric).await?;
        if !range.is_available(earliest, today) {
            return Err(PipelineError::RangeUnavailable { range });
        }

        let start = range.start_date(today).or(earliest).unwrap_or(today);
        let window = DateRange::new(start, today).unwrap_or(DateRange { start: today, end: today });
        let series = self.load_from(metric, window, earliest).await?;

        let points: Vec<SeriesPoint> = self
            .range_filter
            .select(&series.buckets, range, today)
            .into_iter()
            .map(|p| SeriesPoint::new(p.date, metric.to_display(p.value, imperial)))
            .collect();
        let bounds = AxisBounds::for_values(points.iter().map(|p| p.value)).unwrap_or_default();

        Ok(TickerArt {
            metric,
            range,
            unit: metric.display_unit(imperial),
            points,
            bounds,
            effective: series.effective,
        })
    }

    /// Distance since 1 January of the start year, through 31 December of
    /// the end year when that year is over, otherwise through today.
    pub async fn odometer(&self, prefs: &Preferences, today: NaiveDate) -> Result<OdometerArt, PipelineError> {
        let unit = DistanceUnit::preferred(prefs.use_imperial_units);
        let finished = prefs.end_year < today.year();
        let end = if finished {
            NaiveDate::from_ymd_opt(prefs.end_year, 12, 31).unwrap_or(today)
        } else {
            today
        };
        let caption = odometer_chart::caption(unit.plural(), prefs.start_year, finished.then_some(prefs.end_year));

        let window = NaiveDate::from_ymd_opt(prefs.start_year, 1, 1).and_then(|start| DateRange::new(start, end));
        let Some(window) = window else {
            return Ok(OdometerArt {
                unit,
                caption,
                points: Vec::new(),
                effective: None,
            });
        };

        let series = self.load(Metric::Distance, window).await?;
        let points = series
            .daily()
            .into_iter()
            .map(|p| SeriesPoint::new(p.date, unit.from_meters(p.value)))
            .collect();

        Ok(OdometerArt {
            unit,
            caption,
            points,
            effective: series.effective,
        })
    }

    /// The odometer drawn at a widget family's size.
    pub async fn widget_snapshot(
        &self,
        family: WidgetFamily,
        prefs: &Preferences,
        today: NaiveDate,
    ) -> Result<RasterImage, PipelineError> {
        let art = self.odometer(prefs, today).await?;
        Ok(art.render(
            family.size(),
            odometer_chart::DEFAULT_DIGIT_COUNT,
            odometer_chart::DEFAULT_FRACTION_DIGITS,
        )?)
    }

    /// Daily steps for `year`, up to today when the year is still running.
    pub async fn step_art(&self, year: i32, step_goal: i64, today: NaiveDate) -> Result<StepArt, PipelineError> {
        let goal = (step_goal > 0).then_some(step_goal as f64);
        let window = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|start| {
            let end = NaiveDate::from_ymd_opt(year, 12, 31)?.min(today);
            DateRange::new(start, end)
        });
        let Some(window) = window else {
            return Ok(StepArt {
                year,
                points: Vec::new(),
                total_steps: 0.0,
                average_per_day: None,
                goal,
            });
        };

        let series = self.load(Metric::Steps, window).await?;
        let bucket = series.buckets.get(&year);

        Ok(StepArt {
            year,
            points: series.daily(),
            total_steps: bucket.map(|b| b.summary.total_value).unwrap_or(0.0),
            average_per_day: bucket.and_then(|b| b.summary.average()),
            goal,
        })
    }

    /// Years selectable as a start year: earliest recorded year through the
    /// current year.
    pub async fn available_years(&self, metric: Metric, today: NaiveDate) -> Result<Vec<i32>, PipelineError> {
        let current = today.year();
        let first = self
            .earliest(metric)
            .await?
            .map(|d| d.year().min(current))
            .unwrap_or(current);
        Ok((first..=current).collect())
    }

    pub async fn available_ranges(&self, metric: Metric, today: NaiveDate) -> Result<Vec<TimeRange>, PipelineError> {
        Ok(TimeRange::available(self.earliest(metric).await?, today))
    }

    /// Move a stored start year that is no longer selectable back to the
    /// earliest selectable year, and keep the end year at or after it.
    pub async fn reconcile_start_year(
        &self,
        prefs: &UserPreferences,
        metric: Metric,
        today: NaiveDate,
    ) -> Result<Preferences, PipelineError> {
        let years = self.available_years(metric, today).await?;
        let start = prefs.start_year()?;
        if !years.contains(&start) {
            if let Some(&first) = years.first() {
                tracing::info!(stored = start, fallback = first, "start year not selectable, resetting");
                prefs.set_start_year(first)?;
            }
        }
        let start = prefs.start_year()?;
        if prefs.end_year()? < start {
            prefs.set_end_year(start)?;
        }
        Ok(prefs.snapshot()?)
    }
}

fn title_case(text: &str) -> String {
    let spaced = text.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
