// Raster canvas - tiny-skia shapes and embedded-graphics bitmap text
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, Drawable, OriginDimensions, Pixel, Size};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use thiserror::Error;
use tiny_skia::{
    Color, FillRule, GradientStop, LineCap, LinearGradient, Paint, PathBuilder, Pixmap, Rect,
    SpreadMode, Stroke, Transform,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("cannot render a {width}x{height} image")]
    InvalidSize { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(String),
}

/// Pixel dimensions requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    fn to_color(self) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, 255)
    }

    fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(self.0, self.1, self.2)
    }
}

pub mod palette {
    use super::Rgb;

    pub const PAPER: Rgb = Rgb::hex(0xf6f6f6);
    pub const CREAM: Rgb = Rgb::hex(0xfffef7);
    pub const INK: Rgb = Rgb::hex(0x0a0a0a);
    pub const CELL: Rgb = Rgb::hex(0x000000);
    pub const ACCENT: Rgb = Rgb::hex(0xff2d55);
    pub const DIGIT: Rgb = Rgb::hex(0xffffff);
    pub const BLUE: Rgb = Rgb::hex(0x007aff);
    pub const RED: Rgb = Rgb::hex(0xff3b30);
    pub const GRID: Rgb = Rgb::hex(0xdedede);
    pub const MUTED: Rgb = Rgb::hex(0x8e8e93);
}

/// Bitmap faces available for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 6x10 label face.
    Small,
    /// 10x20 face used for odometer digits.
    Large,
}

impl Font {
    fn face(&self) -> &'static MonoFont<'static> {
        match self {
            Font::Small => &FONT_6X10,
            Font::Large => &FONT_10X20,
        }
    }

    pub fn glyph_size(&self) -> (u32, u32) {
        let size = self.face().character_size;
        (size.width, size.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// A finished raster: premultiplied RGBA, row-major.
#[derive(Clone)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// RGBA of one pixel, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Drawing surface for one render pass.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(size: ImageSize, background: Rgb) -> Result<Self, RenderError> {
        let mut pixmap = Pixmap::new(size.width, size.height).ok_or(RenderError::InvalidSize {
            width: size.width,
            height: size.height,
        })?;
        pixmap.fill(background.to_color());
        Ok(Self { pixmap })
    }

    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgb) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let mut pb = PathBuilder::new();
        pb.move_to(x + r, y);
        pb.line_to(x + w - r, y);
        pb.quad_to(x + w, y, x + w, y + r);
        pb.line_to(x + w, y + h - r);
        pb.quad_to(x + w, y + h, x + w - r, y + h);
        pb.line_to(x + r, y + h);
        pb.quad_to(x, y + h, x, y + h - r);
        pb.line_to(x, y + r);
        pb.quad_to(x, y, x + r, y);
        pb.close();

        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgb) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap
                .stroke_path(&path, &solid(color), &stroke(width), Transform::identity(), None);
        }
    }

    pub fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.stroke_polyline(&[from, to], width, color);
    }

    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], width: f32, color: Rgb) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(*x0, *y0);
        for (x, y) in rest {
            pb.line_to(*x, *y);
        }
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &solid(color), &stroke(width), Transform::identity(), None);
        }
    }

    /// Line shaded from `start_color` at `from` to `end_color` at `to`.
    pub fn stroke_gradient_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        start_color: Rgb,
        end_color: Rgb,
    ) {
        let shader = LinearGradient::new(
            tiny_skia::Point::from_xy(from.0, from.1),
            tiny_skia::Point::from_xy(to.0, to.1),
            vec![
                GradientStop::new(0.0, start_color.to_color()),
                GradientStop::new(1.0, end_color.to_color()),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        );
        let Some(shader) = shader else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            let paint = Paint {
                shader,
                anti_alias: true,
                ..Paint::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke(width), Transform::identity(), None);
        }
    }

    /// Draw `text` vertically centred on `y`, each glyph pixel scaled up to
    /// a `scale`x`scale` block.
    pub fn text(&mut self, text: &str, x: f32, y: f32, anchor: Anchor, font: Font, scale: u32, color: Rgb) {
        let alignment = match anchor {
            Anchor::Left => Alignment::Left,
            Anchor::Center => Alignment::Center,
            Anchor::Right => Alignment::Right,
        };
        let character_style = MonoTextStyle::new(font.face(), color.to_rgb888());
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Middle)
            .build();

        let mut target = GlyphTarget {
            pixmap: &mut self.pixmap,
            origin: (x.round() as i32, y.round() as i32),
            scale: scale.max(1),
        };
        Text::with_text_style(
            text,
            embedded_graphics::prelude::Point::zero(),
            character_style,
            text_style,
        )
        .draw(&mut target)
        .ok();
    }

    pub fn finish(self) -> RasterImage {
        RasterImage {
            pixmap: self.pixmap,
        }
    }
}

fn solid(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_color());
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    }
}

/// Adapter that lets embedded-graphics glyphs land on the pixmap.
///
/// Glyphs are laid out around the origin in font units; every lit font pixel
/// becomes a `scale`x`scale` block offset from `origin`.
struct GlyphTarget<'a> {
    pixmap: &'a mut Pixmap,
    origin: (i32, i32),
    scale: u32,
}

impl OriginDimensions for GlyphTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }
}

impl DrawTarget for GlyphTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let scale = self.scale as i32;
        for Pixel(point, color) in pixels {
            let x = self.origin.0 + point.x * scale;
            let y = self.origin.1 + point.y * scale;
            if let Some(rect) = Rect::from_xywh(x as f32, y as f32, scale as f32, scale as f32) {
                let mut paint = Paint::default();
                paint.set_color_rgba8(color.r(), color.g(), color.b(), 255);
                self.pixmap
                    .fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_rejected() {
        let err = Canvas::new(ImageSize::new(0, 10), palette::PAPER).err();
        assert_eq!(err, Some(RenderError::InvalidSize { width: 0, height: 10 }));
    }

    #[test]
    fn test_background_fill() {
        let canvas = Canvas::new(ImageSize::new(4, 3), Rgb::hex(0x102030)).unwrap();
        let image = canvas.finish();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.pixel(0, 0), Some([0x10, 0x20, 0x30, 255]));
        assert_eq!(image.pixel(4, 0), None);
    }

    #[test]
    fn test_text_draws_glyph_pixels() {
        let mut canvas = Canvas::new(ImageSize::new(40, 20), palette::DIGIT).unwrap();
        canvas.text("8", 20.0, 10.0, Anchor::Center, Font::Small, 1, palette::INK);
        let image = canvas.finish();
        let inked = (0..40)
            .flat_map(|x| (0..20).map(move |y| (x, y)))
            .filter(|(x, y)| image.pixel(*x, *y) == Some([0x0a, 0x0a, 0x0a, 255]))
            .count();
        assert!(inked > 5, "expected glyph pixels, found {}", inked);
    }

    #[test]
    fn test_png_signature() {
        let image = Canvas::new(ImageSize::new(8, 8), palette::CREAM).unwrap().finish();
        let png = image.encode_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }
}
