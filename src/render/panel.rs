//! The hardware seam.
//!
//! A panel driver only has to accept a palette-indexed frame and then
//! refresh the glass.  Only the [`Coordinator`](super::Coordinator) calls
//! these, from inside its busy section.

use tracing::info;

use super::error::HardwareWriteError;

pub trait Panel: Send {
    /// Stage a frame: one palette index per pixel, row-major.
    fn set_image(&mut self, width: u32, height: u32, indices: &[u8])
        -> Result<(), HardwareWriteError>;

    /// Push the staged frame to the display.
    fn show(&mut self) -> Result<(), HardwareWriteError>;
}

/// A panel with no glass behind it.  Each refresh is only logged; the PNG
/// preview is the visible output on a dev machine.
#[derive(Debug, Default)]
pub struct HeadlessPanel {
    staged: Option<Frame>,
    refreshes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl HeadlessPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Panel for HeadlessPanel {
    fn set_image(
        &mut self,
        width: u32,
        height: u32,
        indices: &[u8],
    ) -> Result<(), HardwareWriteError> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(HardwareWriteError::new(
                "set_image",
                format!("got {} pixels, expected {expected}", indices.len()),
            ));
        }
        self.staged = Some(Frame {
            width,
            height,
            indices: indices.to_vec(),
        });
        Ok(())
    }

    fn show(&mut self) -> Result<(), HardwareWriteError> {
        let frame = self
            .staged
            .take()
            .ok_or_else(|| HardwareWriteError::new("show", "no image staged"))?;
        self.refreshes += 1;
        let inked = frame.indices.iter().filter(|&&i| i != 0).count();
        info!(
            width = frame.width,
            height = frame.height,
            inked,
            refreshes = self.refreshes,
            "headless panel refreshed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_requires_a_staged_image() {
        let mut panel = HeadlessPanel::new();
        assert!(panel.show().is_err());
        assert_eq!(panel.refreshes, 0);
    }

    #[test]
    fn staged_frame_is_consumed_by_show() {
        let mut panel = HeadlessPanel::new();
        panel.set_image(2, 1, &[0, 2]).unwrap();
        assert_eq!(
            panel.staged.as_ref().map(|f| f.indices.as_slice()),
            Some(&[0u8, 2][..])
        );

        panel.show().unwrap();
        assert_eq!(panel.refreshes, 1);
        assert!(panel.staged.is_none());
        assert!(panel.show().is_err(), "a frame is shown once");
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let mut panel = HeadlessPanel::new();
        let err = panel.set_image(2, 2, &[0]).unwrap_err();
        assert_eq!(err.operation, "set_image");
    }
}
