// Chart renderer - one entry point for every art style
use super::odometer_chart::{self, OdometerStyle};
use super::radial_chart::{self, RadialStyle};
use super::raster::{ImageSize, RasterImage, RenderError};
use super::ticker_chart::{self, TickerStyle};
use crate::domain::axis::AxisBounds;
use crate::domain::sample::SeriesPoint;

#[derive(Debug, Clone, PartialEq)]
pub enum ChartStyle {
    Odometer(OdometerStyle),
    Radial(RadialStyle),
    Ticker(TickerStyle),
}

impl ChartStyle {
    pub fn name(&self) -> &'static str {
        match self {
            ChartStyle::Odometer(_) => "odometer",
            ChartStyle::Radial(_) => "radial",
            ChartStyle::Ticker(_) => "ticker",
        }
    }
}

/// Render `points` in the given style.
///
/// Output depends only on the arguments. The odometer shows the sum of the
/// points; the radial style ignores `bounds` and scales to the series max.
pub fn render(
    points: &[SeriesPoint],
    bounds: AxisBounds,
    size: ImageSize,
    style: &ChartStyle,
) -> Result<RasterImage, RenderError> {
    tracing::debug!(style = style.name(), points = points.len(), width = size.width, height = size.height, "rendering chart");
    match style {
        ChartStyle::Odometer(style) => {
            let total = points.iter().map(|p| p.value).filter(|v| v.is_finite()).sum();
            odometer_chart::draw(total, size, style)
        }
        ChartStyle::Radial(style) => radial_chart::draw(points, size, style),
        ChartStyle::Ticker(style) => ticker_chart::draw(points, bounds, size, style),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series() -> Vec<SeriesPoint> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .iter_days()
            .take(40)
            .enumerate()
            .map(|(i, d)| SeriesPoint::new(d, (i * 137 % 11_000) as f64))
            .collect()
    }

    fn styles() -> Vec<ChartStyle> {
        vec![
            ChartStyle::Odometer(OdometerStyle::new("Steps since 2024")),
            ChartStyle::Radial(RadialStyle {
                goal: Some(3_000.0),
                ..RadialStyle::default()
            }),
            ChartStyle::Ticker(TickerStyle::default()),
        ]
    }

    #[test]
    fn test_render_is_deterministic() {
        let points = series();
        let bounds = AxisBounds::for_values(points.iter().map(|p| p.value)).unwrap_or_default();
        let size = ImageSize::new(338, 158);

        for style in styles() {
            let a = render(&points, bounds, size, &style).unwrap();
            let b = render(&points, bounds, size, &style).unwrap();
            assert_eq!(a.data(), b.data(), "{} differs between runs", style.name());
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        for style in styles() {
            let err = render(&series(), AxisBounds::default(), ImageSize::new(0, 100), &style).unwrap_err();
            assert_eq!(err, RenderError::InvalidSize { width: 0, height: 100 });
        }
    }

    #[test]
    fn test_empty_series_renders_every_style() {
        for style in styles() {
            let image = render(&[], AxisBounds::default(), ImageSize::new(158, 158), &style).unwrap();
            assert_eq!((image.width(), image.height()), (158, 158));
        }
    }

    #[test]
    fn test_png_export_has_signature() {
        let image = render(&series(), AxisBounds::new(0.0, 11_000.0), ImageSize::new(120, 80), &styles()[2]).unwrap();
        let png = image.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
