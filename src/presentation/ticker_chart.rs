// Time-series ticker - line chart with summary annotations
use super::raster::{Anchor, Canvas, Font, ImageSize, RasterImage, RenderError, palette};
use crate::domain::axis::AxisBounds;
use crate::domain::sample::SeriesPoint;
use chrono::NaiveDate;

const TICK_INCREMENTS: usize = 5;
const MARKER_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TickerStyle {
    /// Horizontal and bottom padding around the plot.
    pub padding: f32,
    /// Space above the plot reserved for the summary line.
    pub top_padding: f32,
    pub title: Option<String>,
    pub unit: Option<String>,
}

impl Default for TickerStyle {
    fn default() -> Self {
        Self {
            padding: 40.0,
            top_padding: 56.0,
            title: None,
            unit: None,
        }
    }
}

/// A point placed in raster space for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub timestamp: NaiveDate,
    pub value: f64,
    pub pixel_x: f32,
    pub pixel_y: f32,
}

/// Summary line shown above the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerSummary {
    pub total: f64,
    pub high: Option<SeriesPoint>,
    pub low: Option<SeriesPoint>,
    pub average: Option<f64>,
}

impl TickerSummary {
    pub fn from_points(points: &[SeriesPoint]) -> Self {
        let mut total = 0.0;
        let mut high: Option<SeriesPoint> = None;
        let mut low: Option<SeriesPoint> = None;

        for point in points {
            total += point.value;
            if high.is_none_or(|h| point.value > h.value) {
                high = Some(*point);
            }
            if low.is_none_or(|l| point.value < l.value) {
                low = Some(*point);
            }
        }

        let average = (!points.is_empty()).then(|| total / points.len() as f64);
        Self {
            total,
            high,
            low,
            average,
        }
    }
}

/// Linear map of `value` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`.
/// A degenerate source range maps to the middle of the target.
pub fn lerp(value: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    let span = from_hi - from_lo;
    if span == 0.0 || !span.is_finite() {
        return (to_lo + to_hi) / 2.0;
    }
    to_lo + (value - from_lo) / span * (to_hi - to_lo)
}

/// Place each point in raster space. Y is inverted: `bounds.upper` lands on
/// `top_padding`, `bounds.lower` on `height - padding`.
pub fn layout_points(
    points: &[SeriesPoint],
    bounds: AxisBounds,
    size: ImageSize,
    style: &TickerStyle,
) -> Vec<ChartPoint> {
    let width = f64::from(size.width);
    let height = f64::from(size.height);
    let padding = f64::from(style.padding);
    let top = f64::from(style.top_padding);
    let last_index = points.len().saturating_sub(1) as f64;

    points
        .iter()
        .enumerate()
        .map(|(index, point)| ChartPoint {
            timestamp: point.date,
            value: point.value,
            pixel_x: lerp(index as f64, 0.0, last_index, padding, width - padding) as f32,
            pixel_y: lerp(point.value, bounds.lower, bounds.upper, height - padding, top) as f32,
        })
        .collect()
}

/// Short tick label: whole numbers when possible, k/M suffixes for big values.
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 10_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn format_date(date: NaiveDate, long_span: bool) -> String {
    if long_span {
        date.format("%b %Y").to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

pub(super) fn draw(
    points: &[SeriesPoint],
    bounds: AxisBounds,
    size: ImageSize,
    style: &TickerStyle,
) -> Result<RasterImage, RenderError> {
    let mut canvas = Canvas::new(size, palette::CREAM)?;
    let width = size.width as f32;
    let height = size.height as f32;
    let left = style.padding;
    let right = width - style.padding;
    let bottom = height - style.padding;
    let top = style.top_padding;

    for tick in bounds.ticks(TICK_INCREMENTS) {
        let y = lerp(tick, bounds.lower, bounds.upper, f64::from(bottom), f64::from(top)) as f32;
        canvas.stroke_line((left, y), (right, y), 1.0, palette::GRID);
        canvas.text(&format_value(tick), left - 4.0, y, Anchor::Right, Font::Small, 1, palette::MUTED);
    }

    if let Some(title) = &style.title {
        canvas.text(title, left, top / 4.0, Anchor::Left, Font::Small, 1, palette::INK);
    }

    if points.is_empty() {
        canvas.text("No data", width / 2.0, (top + bottom) / 2.0, Anchor::Center, Font::Small, 1, palette::MUTED);
        return Ok(canvas.finish());
    }

    let summary = TickerSummary::from_points(points);
    let unit = style.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default();
    let mut line = format!("Total {}{}", format_value(summary.total), unit);
    if let (Some(high), Some(low), Some(avg)) = (summary.high, summary.low, summary.average) {
        line.push_str(&format!(
            "  High {}  Low {}  Avg {}",
            format_value(high.value),
            format_value(low.value),
            format_value(avg)
        ));
    }
    canvas.text(&line, left, top * 0.6, Anchor::Left, Font::Small, 1, palette::INK);

    let placed = layout_points(points, bounds, size, style);
    let path: Vec<(f32, f32)> = placed.iter().map(|p| (p.pixel_x, p.pixel_y)).collect();
    canvas.stroke_polyline(&path, 2.0, palette::BLUE);
    for point in &placed {
        canvas.fill_circle(point.pixel_x, point.pixel_y, MARKER_RADIUS, palette::BLUE);
    }

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let long_span = (last.date - first.date).num_days() > 180;
        let label_y = bottom + style.padding / 2.0;
        canvas.text(&format_date(first.date, long_span), left, label_y, Anchor::Left, Font::Small, 1, palette::MUTED);
        if points.len() > 1 {
            canvas.text(&format_date(last.date, long_span), right, label_y, Anchor::Right, Font::Small, 1, palette::MUTED);
        }
    }

    Ok(canvas.finish())
}
