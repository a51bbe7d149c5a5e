//! Canvas composition: framing bands, hatching and text placement.
//!
//! Geometry is computed first as a [`Plan`] and only then drawn, so the
//! numbers can be checked without inspecting pixels.

use std::fmt;

use embedded_graphics::draw_target::DrawTargetExt;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use tracing::debug;

use super::canvas::Canvas;
use super::error::LayoutError;
use super::fonts::{line_height, text_width, FontSet};
use super::layout::wrap;
use super::palette::{ACCENT, BACKGROUND, INK};
use super::RenderJob;

/// Fixed spacing constants, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSettings {
    /// Total horizontal padding; text wraps at `width - padding`.
    pub padding: u32,
    /// Gap between headline and body.
    pub block_gap: u32,
    /// Distance between hatch lines.
    pub hatch_spacing: u32,
    /// Stroke width of hatch lines.
    pub hatch_width: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            padding: 50,
            block_gap: 20,
            hatch_spacing: 12,
            hatch_width: 3,
        }
    }
}

/// Wrapped lines plus where and how to draw them.
#[derive(Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font: &'static MonoFont<'static>,
    pub color: Rgb888,
    /// Top-left corner of the first line.
    pub origin: Point,
}

impl TextBlock {
    pub fn height(&self) -> u32 {
        self.lines.len() as u32 * line_height(self.font)
    }
}

impl fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBlock")
            .field("lines", &self.lines)
            .field("glyph", &self.font.character_size)
            .field("color", &self.color)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Computed geometry for one job.
#[derive(Debug, Clone)]
pub struct Plan {
    pub blocks: Vec<TextBlock>,
    /// Top of the combined text stack.
    pub text_top: i32,
    /// Height of the combined text stack, gaps included.
    pub text_height: u32,
    /// Accent bands above and below the text.
    pub frames: Vec<Rectangle>,
}

pub struct Composer {
    width: u32,
    height: u32,
    fonts: FontSet,
    settings: LayoutSettings,
}

impl Composer {
    pub fn new(width: u32, height: u32, fonts: FontSet, settings: LayoutSettings) -> Self {
        Self {
            width,
            height,
            fonts,
            settings,
        }
    }

    /// Width text is wrapped to.
    pub fn max_width(&self) -> Result<u32, LayoutError> {
        match self.width.checked_sub(self.settings.padding) {
            Some(w) if w > 0 => Ok(w),
            _ => Err(LayoutError::CanvasTooSmall {
                width: self.width,
                padding: self.settings.padding,
            }),
        }
    }

    /// Wrap and position the job's text, and size the framing bands.
    ///
    /// The whole wrapped stack is centred vertically; its bounding box is
    /// what the bands are measured against.
    pub fn plan(&self, job: &RenderJob) -> Result<Plan, LayoutError> {
        let max_width = self.max_width()?;
        let x = ((self.width - max_width) / 2) as i32;

        let mut blocks = match job {
            RenderJob::Quote { text } => {
                vec![self.block(text, self.fonts.quote, INK, max_width)]
            }
            RenderJob::ArticleView { headline, body } => vec![
                self.block(headline, self.fonts.headline, ACCENT, max_width),
                self.block(body, self.fonts.body, INK, max_width),
            ],
        };

        let filled = blocks.iter().filter(|b| !b.lines.is_empty()).count() as u32;
        let gaps = filled.saturating_sub(1) * self.settings.block_gap;
        let text_height = blocks.iter().map(TextBlock::height).sum::<u32>() + gaps;
        let text_top = (self.height as i32 - text_height as i32) / 2;

        let mut y = text_top;
        let mut placed_any = false;
        for block in &mut blocks {
            if block.lines.is_empty() {
                block.origin = Point::new(x, y);
                continue;
            }
            if placed_any {
                y += self.settings.block_gap as i32;
            }
            block.origin = Point::new(x, y);
            y += block.height() as i32;
            placed_any = true;
        }

        let frames = self.frames(text_top, text_height);
        Ok(Plan {
            blocks,
            text_top,
            text_height,
            frames,
        })
    }

    /// Draw `job` onto a fresh canvas.
    pub fn compose(&self, job: &RenderJob) -> Result<Canvas, LayoutError> {
        let plan = self.plan(job)?;
        debug!(
            job = job.kind(),
            lines = plan.blocks.iter().map(|b| b.lines.len()).sum::<usize>(),
            text_top = plan.text_top,
            text_height = plan.text_height,
            "composing"
        );
        let mut canvas = Canvas::new(self.width, self.height, BACKGROUND);

        for frame in &plan.frames {
            self.draw_frame(&mut canvas, frame);
        }
        for block in &plan.blocks {
            draw_block(&mut canvas, block);
        }
        Ok(canvas)
    }

    fn block(
        &self,
        text: &str,
        font: &'static MonoFont<'static>,
        color: Rgb888,
        max_width: u32,
    ) -> TextBlock {
        let lines = wrap(&normalize(text), max_width, |s| text_width(font, s));
        TextBlock {
            lines,
            font,
            color,
            origin: Point::zero(),
        }
    }

    fn frames(&self, text_top: i32, text_height: u32) -> Vec<Rectangle> {
        let inset = (self.settings.padding / 4) as i32;
        let right = self.width as i32 - inset;
        let text_bottom = text_top + text_height as i32;
        let mut frames = Vec::with_capacity(2);

        let top_end = text_top - inset;
        if top_end > inset {
            frames.push(Rectangle::with_corners(
                Point::new(inset, inset),
                Point::new(right, top_end),
            ));
        }

        let bottom_start = text_bottom + inset + 5;
        let bottom_end = self.height as i32 - inset;
        if bottom_end > bottom_start {
            frames.push(Rectangle::with_corners(
                Point::new(inset, bottom_start),
                Point::new(right, bottom_end),
            ));
        }
        frames
    }

    /// Solid accent band with background-coloured diagonal stripes.
    fn draw_frame(&self, canvas: &mut Canvas, frame: &Rectangle) {
        frame
            .into_styled(PrimitiveStyle::with_fill(ACCENT))
            .draw(canvas)
            .ok();

        let w = self.width as i32;
        let h = self.height as i32;
        let stroke = PrimitiveStyle::with_stroke(BACKGROUND, self.settings.hatch_width);
        let mut clipped = canvas.clipped(frame);
        let step = self.settings.hatch_spacing.max(1) as usize;

        for x in (0..2 * w).step_by(step) {
            Line::new(Point::new(x, 0), Point::new(x - w, h))
                .into_styled(stroke)
                .draw(&mut clipped)
                .ok();
        }
    }
}

fn draw_block(canvas: &mut Canvas, block: &TextBlock) {
    let style = MonoTextStyle::new(block.font, block.color);
    let lh = line_height(block.font) as i32;

    for (i, line) in block.lines.iter().enumerate() {
        let at = block.origin + Point::new(0, i as i32 * lh);
        Text::with_baseline(line, at, style, Baseline::Top)
            .draw(canvas)
            .ok();
    }
}

/// Fold typographic punctuation into what the bitmap fonts carry and
/// collapse all whitespace runs to single spaces.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for c in word.chars() {
            match c {
                '\u{2018}' | '\u{2019}' => out.push('\''),
                '\u{201C}' | '\u{201D}' => out.push('"'),
                '\u{2013}' | '\u{2014}' => out.push('-'),
                '\u{2026}' => out.push_str("..."),
                _ => out.push(c),
            }
        }
    }
    out
}
