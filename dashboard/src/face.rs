//! Drawing routines for the status face.
//!
//! One row per metric (a swatch in the band colour, then the value and its
//! label), followed by one banner per alert.

use std::convert::Infallible;

use airq::Band;
use embedded_graphics::Drawable;
use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{Dimensions, OriginDimensions};
use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics_core::Pixel;

use crate::report::{BannerStyle, StatusReport};

/// Room for three widgets and four banners of about 50 characters.
pub const FACE_SIZE: Size = Size::new(320, 120);

const ROW_HEIGHT: i32 = 14;
const MARGIN: i32 = 2;

pub const GOOD: Rgb888 = Rgb888::new(76, 175, 80);
pub const MODERATE: Rgb888 = Rgb888::new(255, 193, 7);
pub const POOR: Rgb888 = Rgb888::new(244, 67, 54);
pub const INFO: Rgb888 = Rgb888::new(96, 125, 139);

pub fn band_color(band: Band) -> Rgb888 {
    match band {
        Band::Low => GOOD,
        Band::Mid => MODERATE,
        Band::High => POOR,
    }
}

pub fn banner_color(style: BannerStyle) -> Rgb888 {
    match style {
        BannerStyle::Info => INFO,
        BannerStyle::Warning => MODERATE,
        BannerStyle::Danger => POOR,
    }
}

/// Render the status report onto the provided DrawTarget.
pub fn draw_status<D>(report: &StatusReport, canvas: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    canvas.clear(Rgb888::BLACK)?;
    let width = canvas.bounding_box().size.width;
    let text = MonoTextStyle::new(&FONT_6X10, Rgb888::WHITE);
    let mut y = MARGIN;

    for widget in &report.widgets {
        Rectangle::new(Point::new(MARGIN, y + 1), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(band_color(widget.band)))
            .draw(canvas)?;
        let line = format!(
            "{:<12}{:>6}  {}",
            widget.metric.name(),
            widget.display_value(),
            widget.label
        );
        Text::with_baseline(&line, Point::new(MARGIN + 12, y), text, Baseline::Top).draw(canvas)?;
        y += ROW_HEIGHT;
    }

    if !report.widgets.is_empty() {
        y += MARGIN * 2;
    }

    let banner_text = MonoTextStyle::new(&FONT_6X10, Rgb888::BLACK);
    for banner in &report.banners {
        Rectangle::new(
            Point::new(0, y),
            Size::new(width, (ROW_HEIGHT - 1) as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(banner_color(banner.style)))
        .draw(canvas)?;
        Text::with_baseline(
            &banner.message,
            Point::new(MARGIN, y + 2),
            banner_text,
            Baseline::Top,
        )
        .draw(canvas)?;
        y += ROW_HEIGHT;
    }
    Ok(())
}

/// An in-memory face, for running without a display.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl Framebuffer {
    pub fn new(size: Size) -> Self {
        let count = (size.width * size.height) as usize;
        Self {
            size,
            pixels: vec![Rgb888::BLACK; count],
        }
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb888> {
        let index = self.index(point)?;
        self.pixels.get(index).copied()
    }

    /// Number of pixels of exactly this colour.
    pub fn count(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|p| **p == color).count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some((y * self.size.width + x) as usize)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(FACE_SIZE)
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // Out-of-bounds writes are dropped.
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index(point) {
                self.pixels[index] = color;
            }
        }
        Ok(())
    }
}
