//! Host-side raster that embedded-graphics draws into.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// A fixed-size RGB pixel buffer, row-major.
///
/// Pixels drawn outside the canvas are dropped, so callers never have to
/// clamp coordinates themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl Canvas {
    /// A canvas of the given size filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Colour at `(x, y)`, or `None` outside the canvas.
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            if x >= self.width || y >= self.height {
                continue;
            }
            let idx = self.index(x, y);
            if let Some(px) = self.pixels.get_mut(idx) {
                *px = color;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn starts_filled_with_background() {
        let canvas = Canvas::new(4, 3, Rgb888::WHITE);
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.pixels().iter().all(|&p| p == Rgb888::WHITE));
    }

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let mut canvas = Canvas::new(4, 4, Rgb888::WHITE);
        Rectangle::new(Point::new(-2, -2), Size::new(20, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(canvas.pixel(0, 0), Some(Rgb888::RED));
        assert_eq!(canvas.pixel(3, 0), Some(Rgb888::RED));
        assert_eq!(canvas.pixel(0, 1), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }
}
