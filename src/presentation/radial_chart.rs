// Radial step art - one spoke per day of the year
use super::raster::{Anchor, Canvas, Font, ImageSize, RasterImage, RenderError, palette};
use crate::domain::sample::{SeriesPoint, days_in_year};
use chrono::{Datelike, NaiveDate};
use std::f64::consts::{FRAC_PI_2, TAU};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq)]
pub struct RadialStyle {
    /// Radius of the empty opening in the centre.
    pub inner_radius: f32,
    pub line_width: f32,
    /// Daily goal drawn as a ring, in the same unit as the values.
    pub goal: Option<f64>,
}

impl Default for RadialStyle {
    fn default() -> Self {
        Self {
            inner_radius: 15.0,
            line_width: 2.0,
            goal: None,
        }
    }
}

/// Angle in radians for day `index` of `total`, starting at 12 o'clock and
/// running clockwise in raster space.
pub fn radial_angle(index: usize, total: usize) -> f64 {
    if total == 0 {
        return -FRAC_PI_2;
    }
    TAU * index as f64 / total as f64 - FRAC_PI_2
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialSpoke {
    pub date: NaiveDate,
    pub value: f64,
    pub angle: f64,
    pub start: (f32, f32),
    pub end: (f32, f32),
}

/// Ring geometry shared by spokes, the goal ring and the labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGeometry {
    pub center: (f32, f32),
    pub inner: f32,
    pub spoke_outer: f32,
    pub label_radius: f32,
}

impl RadialGeometry {
    pub fn new(size: ImageSize, style: &RadialStyle) -> Self {
        let center = (size.width as f32 / 2.0, size.height as f32 / 2.0);
        let outer = size.width.min(size.height) as f32 / 2.0;
        let inner = style.inner_radius.min(outer * 0.5).max(0.0);
        Self {
            center,
            inner,
            spoke_outer: (outer * 0.78).max(inner),
            label_radius: outer * 0.9,
        }
    }

    fn point_at(&self, angle: f64, radius: f32) -> (f32, f32) {
        (
            self.center.0 + radius * angle.cos() as f32,
            self.center.1 + radius * angle.sin() as f32,
        )
    }

    /// Radius reached by `value` when `max` maps to the outer spoke end.
    pub fn radius_for(&self, value: f64, max: f64) -> f32 {
        if max <= 0.0 {
            return self.inner;
        }
        let t = (value / max).clamp(0.0, 1.0) as f32;
        self.inner + t * (self.spoke_outer - self.inner)
    }
}

/// Spokes for one calendar year of daily values.
///
/// The day index comes from each point's date relative to 1 January of the
/// first point's year, so missing days leave gaps instead of shifting later
/// days round the circle. Points from other years are ignored.
pub fn layout_spokes(points: &[SeriesPoint], size: ImageSize, style: &RadialStyle) -> Vec<RadialSpoke> {
    let drawn = drawn_year(points);
    let Some(first) = drawn.first() else {
        return Vec::new();
    };
    let total = days_in_year(first.date.year()) as usize;
    let geometry = RadialGeometry::new(size, style);
    let max = series_max(&drawn);

    drawn
        .iter()
        .map(|p| {
            let angle = radial_angle(p.date.ordinal0() as usize, total);
            RadialSpoke {
                date: p.date,
                value: p.value,
                angle,
                start: geometry.point_at(angle, geometry.inner),
                end: geometry.point_at(angle, geometry.radius_for(p.value, max)),
            }
        })
        .collect()
}

/// Points in the calendar year of the first point.
fn drawn_year(points: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let Some(year) = points.first().map(|p| p.date.year()) else {
        return Vec::new();
    };
    points.iter().filter(|p| p.date.year() == year).copied().collect()
}

fn series_max(points: &[SeriesPoint]) -> f64 {
    points
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

pub(super) fn draw(points: &[SeriesPoint], size: ImageSize, style: &RadialStyle) -> Result<RasterImage, RenderError> {
    let mut canvas = Canvas::new(size, palette::CREAM)?;
    let geometry = RadialGeometry::new(size, style);
    let max = series_max(&drawn_year(points));

    if let Some(goal) = style.goal.filter(|g| *g > 0.0 && *g < max) {
        let radius = geometry.radius_for(goal, max);
        canvas.stroke_circle(geometry.center.0, geometry.center.1, radius, 1.0, palette::GRID);
    }

    for spoke in layout_spokes(points, size, style) {
        if spoke.start == spoke.end {
            continue;
        }
        canvas.stroke_gradient_line(spoke.start, spoke.end, style.line_width, palette::BLUE, palette::RED);
    }

    for (month, label) in MONTH_LABELS.iter().enumerate() {
        let angle = radial_angle(month, MONTH_LABELS.len());
        let (x, y) = geometry.point_at(angle, geometry.label_radius);
        canvas.text(label, x, y, Anchor::Center, Font::Small, 1, palette::INK);
    }

    Ok(canvas.finish())
}
