//! Built-in bitmap fonts and the metrics the layout engine measures with.

use embedded_graphics::mono_font::iso_8859_1::{
    FONT_10X20, FONT_6X10, FONT_6X13, FONT_6X13_BOLD, FONT_7X13, FONT_7X13_BOLD, FONT_7X14,
    FONT_7X14_BOLD, FONT_8X13, FONT_8X13_BOLD, FONT_9X15, FONT_9X15_BOLD, FONT_9X18,
    FONT_9X18_BOLD,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::Baseline;

use super::error::LayoutError;

/// Names accepted in the `[fonts]` config section.
pub const FONT_NAMES: &[&str] = &[
    "6x10", "6x13", "6x13_bold", "7x13", "7x13_bold", "7x14", "7x14_bold", "8x13", "8x13_bold",
    "9x15", "9x15_bold", "9x18", "9x18_bold", "10x20",
];

/// Look up a built-in font by its config name.
pub fn font_by_name(name: &str) -> Result<&'static MonoFont<'static>, LayoutError> {
    let font = match name.to_ascii_lowercase().as_str() {
        "6x10" => &FONT_6X10,
        "6x13" => &FONT_6X13,
        "6x13_bold" => &FONT_6X13_BOLD,
        "7x13" => &FONT_7X13,
        "7x13_bold" => &FONT_7X13_BOLD,
        "7x14" => &FONT_7X14,
        "7x14_bold" => &FONT_7X14_BOLD,
        "8x13" => &FONT_8X13,
        "8x13_bold" => &FONT_8X13_BOLD,
        "9x15" => &FONT_9X15,
        "9x15_bold" => &FONT_9X15_BOLD,
        "9x18" => &FONT_9X18,
        "9x18_bold" => &FONT_9X18_BOLD,
        "10x20" => &FONT_10X20,
        _ => return Err(LayoutError::UnknownFont(name.to_string())),
    };
    Ok(font)
}

/// The three faces a render can use.
#[derive(Clone, Copy)]
pub struct FontSet {
    pub quote: &'static MonoFont<'static>,
    pub headline: &'static MonoFont<'static>,
    pub body: &'static MonoFont<'static>,
}

impl FontSet {
    pub fn from_names(quote: &str, headline: &str, body: &str) -> Result<Self, LayoutError> {
        Ok(Self {
            quote: font_by_name(quote)?,
            headline: font_by_name(headline)?,
            body: font_by_name(body)?,
        })
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            quote: &FONT_10X20,
            headline: &FONT_9X18_BOLD,
            body: &FONT_8X13,
        }
    }
}

/// Rendered width of `text` in pixels.
pub fn text_width(font: &MonoFont<'_>, text: &str) -> u32 {
    MonoTextStyle::new(font, Rgb888::BLACK)
        .measure_string(text, Point::zero(), Baseline::Top)
        .bounding_box
        .size
        .width
}

/// Vertical advance between consecutive lines.
pub fn line_height(font: &MonoFont<'_>) -> u32 {
    MonoTextStyle::new(font, Rgb888::BLACK).line_height()
}
