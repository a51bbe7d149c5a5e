//! Reduction of a composed canvas to the panel's three colours.

use std::fs;
use std::path::Path;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use image::RgbImage;
use tracing::{debug, warn};

use super::canvas::Canvas;
use super::error::PersistenceError;

pub const BACKGROUND: Rgb888 = Rgb888::WHITE;
pub const INK: Rgb888 = Rgb888::BLACK;
pub const ACCENT: Rgb888 = Rgb888::new(255, 0, 0);

/// Panel colours in the driver's index order.
pub const PALETTE: [Rgb888; 3] = [BACKGROUND, INK, ACCENT];

/// Output of [`encode`].
#[derive(Debug, Clone)]
pub struct Encoded {
    /// One palette index per pixel, row-major.  What the driver consumes.
    pub indices: Vec<u8>,
    /// Human-viewable snapshot containing only palette colours.
    pub preview: RgbImage,
}

/// Index into [`PALETTE`] of the colour closest to `color`.
pub fn nearest_index(color: Rgb888) -> u8 {
    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for (i, entry) in PALETTE.iter().enumerate() {
        let dist = distance(color, *entry);
        if dist < best_dist {
            best = i as u8;
            best_dist = dist;
        }
    }
    best
}

fn distance(a: Rgb888, b: Rgb888) -> u32 {
    let dr = i32::from(a.r()) - i32::from(b.r());
    let dg = i32::from(a.g()) - i32::from(b.g());
    let db = i32::from(a.b()) - i32::from(b.b());
    (dr * dr + dg * dg + db * db) as u32
}

/// Snap every pixel of `canvas` to the palette.
pub fn encode(canvas: &Canvas) -> Encoded {
    let mut indices = Vec::with_capacity(canvas.pixels().len());
    let mut preview = RgbImage::new(canvas.width(), canvas.height());

    for (px, out) in canvas.pixels().iter().zip(preview.pixels_mut()) {
        let idx = nearest_index(*px);
        let snapped = PALETTE[usize::from(idx)];
        indices.push(idx);
        *out = image::Rgb([snapped.r(), snapped.g(), snapped.b()]);
    }

    Encoded { indices, preview }
}

/// Write the preview as a PNG at `path`, creating parent directories.
pub fn save_preview(preview: &RgbImage, path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    preview.save(path).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// [`save_preview`], but a failure is only logged.
pub fn persist_preview(preview: &RgbImage, path: &Path) {
    match save_preview(preview, path) {
        Ok(()) => debug!(path = %path.display(), "preview saved"),
        Err(e) => warn!(error = %e, "preview not saved"),
    }
}
