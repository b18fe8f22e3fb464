// Presentation layer - rasterised chart art
pub mod chart_renderer;
pub mod odometer_chart;
pub mod radial_chart;
pub mod raster;
pub mod ticker_chart;
pub mod widget;

pub use chart_renderer::{ChartStyle, render};
pub use raster::{ImageSize, RasterImage, RenderError};
