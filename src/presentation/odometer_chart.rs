// Digit-grid odometer art
use super::raster::{Anchor, Canvas, Font, ImageSize, RasterImage, RenderError, palette};
use crate::domain::odometer::{self, OdometerReading};

pub const DEFAULT_DIGIT_COUNT: usize = 8;
pub const DEFAULT_FRACTION_DIGITS: usize = 2;

const CELL_INSET: f32 = 2.0;
const CORNER_RADIUS: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OdometerStyle {
    pub digit_count: usize,
    pub fraction_digits: usize,
    pub caption: String,
}

impl OdometerStyle {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            digit_count: DEFAULT_DIGIT_COUNT,
            fraction_digits: DEFAULT_FRACTION_DIGITS,
            caption: caption.into(),
        }
    }
}

/// "Miles since 2024" or "Miles from 2021 to 2023".
pub fn caption(unit: &str, start_year: i32, end_year: Option<i32>) -> String {
    let mut label = String::with_capacity(unit.len() + 16);
    let mut chars = unit.chars();
    if let Some(first) = chars.next() {
        label.extend(first.to_uppercase());
        label.push_str(chars.as_str());
    }

    match end_year {
        Some(end) if end > start_year => format!("{} from {} to {}", label, start_year, end),
        _ => format!("{} since {}", label, start_year),
    }
}

/// Cell rectangles for a reading: (x, y, width, height), left to right.
pub fn cell_layout(reading: &OdometerReading, size: ImageSize) -> Vec<(f32, f32, f32, f32)> {
    let count = reading.len().max(1) as f32;
    let width = size.width as f32;
    let height = size.height as f32;

    let caption_band = caption_band(size);
    let cell_w = width / count;
    let cell_h = cell_w.min((height - caption_band).max(1.0));
    let y = ((height - caption_band - cell_h) / 2.0).max(0.0);

    (0..reading.len())
        .map(|i| (i as f32 * cell_w, y, cell_w, cell_h))
        .collect()
}

fn caption_scale(size: ImageSize) -> u32 {
    if size.height >= 300 { 2 } else { 1 }
}

fn caption_band(size: ImageSize) -> f32 {
    let (_, glyph_h) = Font::Small.glyph_size();
    (glyph_h * caption_scale(size)) as f32 + 20.0
}

pub(super) fn draw(total: f64, size: ImageSize, style: &OdometerStyle) -> Result<RasterImage, RenderError> {
    let mut canvas = Canvas::new(size, palette::PAPER)?;
    let reading = odometer::format(total, style.digit_count, style.fraction_digits);

    let (glyph_w, glyph_h) = Font::Large.glyph_size();
    for (index, (x, y, w, h)) in cell_layout(&reading, size).into_iter().enumerate() {
        let fill = if reading.is_accent(index) {
            palette::ACCENT
        } else {
            palette::CELL
        };
        let inner_w = (w - 2.0 * CELL_INSET).max(1.0);
        let inner_h = (h - 2.0 * CELL_INSET).max(1.0);
        let radius = CORNER_RADIUS.min(inner_w * 0.2);
        canvas.fill_rounded_rect(x + CELL_INSET, y + CELL_INSET, inner_w, inner_h, radius, fill);

        // Digits fill roughly 70% of the cell, in whole glyph-pixel steps.
        let scale = ((inner_w * 0.7) / glyph_w as f32)
            .min((inner_h * 0.7) / glyph_h as f32)
            .floor()
            .max(1.0) as u32;
        let digit = reading.cells()[index].to_string();
        canvas.text(
            &digit,
            x + w / 2.0,
            y + h / 2.0,
            Anchor::Center,
            Font::Large,
            scale,
            palette::DIGIT,
        );
    }

    let scale = caption_scale(size);
    let caption_y = size.height as f32 - caption_band(size) / 2.0;
    canvas.text(
        &style.caption,
        size.width as f32 / 2.0,
        caption_y,
        Anchor::Center,
        Font::Small,
        scale,
        palette::INK,
    );

    Ok(canvas.finish())
}
