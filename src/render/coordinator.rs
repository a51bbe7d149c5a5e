//! Exclusive access to the one physical panel.
//!
//! Every render, manual or rotated, goes through [`Coordinator::submit`].
//! The busy check and the transition to busy are a single compare-and-swap,
//! and the release is tied to a guard's `Drop`, so a failing or panicking
//! stage can never leave the display stuck in [`DisplayStatus::Busy`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use super::compose::Composer;
use super::error::{RenderError, SubmitError};
use super::palette;
use super::panel::Panel;
use super::RenderJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Idle,
    Busy,
}

/// The last job that made it onto the glass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed {
    pub job: RenderJob,
    pub rendered_at: DateTime<Utc>,
}

pub struct Coordinator {
    busy: AtomicBool,
    composer: Composer,
    panel: Mutex<Box<dyn Panel>>,
    preview_path: Option<PathBuf>,
    displayed: RwLock<Option<Displayed>>,
    renders: AtomicU64,
}

impl Coordinator {
    /// `preview_path` of `None` disables the preview snapshot.
    pub fn new(composer: Composer, panel: Box<dyn Panel>, preview_path: Option<PathBuf>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            composer,
            panel: Mutex::new(panel),
            preview_path,
            displayed: RwLock::new(None),
            renders: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> DisplayStatus {
        if self.busy.load(Ordering::Acquire) {
            DisplayStatus::Busy
        } else {
            DisplayStatus::Idle
        }
    }

    pub fn currently_displayed(&self) -> Option<Displayed> {
        self.displayed.read().clone()
    }

    /// Number of jobs that reached the panel since start.
    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::Relaxed)
    }

    /// Render `job` now, or fail fast with [`SubmitError::Rejected`] if
    /// another job holds the display.
    ///
    /// Runs the whole pipeline on the calling thread.  Busy is released
    /// before any failure is returned.
    pub fn submit(&self, job: RenderJob) -> Result<(), SubmitError> {
        let kind = job.kind();
        let outcome = {
            let Some(_busy) = BusyGuard::acquire(&self.busy) else {
                debug!(job = kind, "display busy, job rejected");
                return Err(SubmitError::Rejected);
            };
            info!(job = kind, "render accepted");

            let outcome = self.run(&job);
            if outcome.is_ok() {
                *self.displayed.write() = Some(Displayed {
                    job,
                    rendered_at: Utc::now(),
                });
                self.renders.fetch_add(1, Ordering::Relaxed);
            }
            outcome
        };

        match outcome {
            Ok(()) => {
                info!(job = kind, "render complete");
                Ok(())
            }
            Err(e) => {
                error!(job = kind, stage = %e.stage(), error = %e, "render failed");
                Err(SubmitError::Failed(e))
            }
        }
    }

    fn run(&self, job: &RenderJob) -> Result<(), RenderError> {
        let canvas = self.composer.compose(job)?;
        let encoded = palette::encode(&canvas);

        {
            let mut panel = self.panel.lock();
            panel.set_image(canvas.width(), canvas.height(), &encoded.indices)?;
            panel.show()?;
        }

        if let Some(path) = &self.preview_path {
            palette::persist_preview(&encoded.preview, path);
        }
        Ok(())
    }
}

/// Holds the busy flag for as long as it lives.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::error::{HardwareWriteError, Stage};
    use crate::render::{FontSet, HeadlessPanel, LayoutSettings};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Arc;
    use std::thread;

    fn composer() -> Composer {
        Composer::new(400, 300, FontSet::default(), LayoutSettings::default())
    }

    fn quote(text: &str) -> RenderJob {
        RenderJob::Quote { text: text.into() }
    }

    /// Blocks inside `show` until the test lets it go.
    struct GatedPanel {
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl Panel for GatedPanel {
        fn set_image(&mut self, _: u32, _: u32, _: &[u8]) -> Result<(), HardwareWriteError> {
            Ok(())
        }

        fn show(&mut self) -> Result<(), HardwareWriteError> {
            self.entered.send(()).ok();
            self.release
                .recv()
                .map_err(|e| HardwareWriteError::new("show", e.to_string()))
        }
    }

    /// Fails the first `failures` refreshes.
    struct FlakyPanel {
        failures: usize,
    }

    impl Panel for FlakyPanel {
        fn set_image(&mut self, _: u32, _: u32, _: &[u8]) -> Result<(), HardwareWriteError> {
            Ok(())
        }

        fn show(&mut self) -> Result<(), HardwareWriteError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(HardwareWriteError::new("show", "busy pin stuck"));
            }
            Ok(())
        }
    }

    struct PanickingPanel;

    impl Panel for PanickingPanel {
        fn set_image(&mut self, _: u32, _: u32, _: &[u8]) -> Result<(), HardwareWriteError> {
            Ok(())
        }

        fn show(&mut self) -> Result<(), HardwareWriteError> {
            panic!("driver bug");
        }
    }

    #[test]
    fn starts_idle_with_nothing_displayed() {
        let coord = Coordinator::new(composer(), Box::new(HeadlessPanel::new()), None);
        assert_eq!(coord.status(), DisplayStatus::Idle);
        assert!(coord.currently_displayed().is_none());
        assert_eq!(coord.renders(), 0);
    }

    #[test]
    fn successful_render_updates_currently_displayed() {
        let coord = Coordinator::new(composer(), Box::new(HeadlessPanel::new()), None);
        coord.submit(quote("hello")).unwrap();

        let shown = coord.currently_displayed().unwrap();
        assert_eq!(shown.job, quote("hello"));
        assert_eq!(coord.status(), DisplayStatus::Idle);
    }

    #[test]
    fn concurrent_submit_is_rejected_until_first_completes() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let panel = GatedPanel {
            entered: entered_tx,
            release: release_rx,
        };
        let coord = Arc::new(Coordinator::new(composer(), Box::new(panel), None));

        let first = {
            let coord = Arc::clone(&coord);
            thread::spawn(move || coord.submit(quote("first")))
        };
        entered_rx.recv().unwrap();

        assert_eq!(coord.status(), DisplayStatus::Busy);
        assert!(matches!(
            coord.submit(quote("second")),
            Err(SubmitError::Rejected)
        ));

        release_tx.send(()).unwrap();
        first.join().unwrap().unwrap();
        assert_eq!(coord.status(), DisplayStatus::Idle);
        assert_eq!(coord.currently_displayed().unwrap().job, quote("first"));

        release_tx.send(()).unwrap();
        coord.submit(quote("third")).unwrap();
        assert_eq!(coord.currently_displayed().unwrap().job, quote("third"));
    }

    #[test]
    fn hardware_failure_releases_busy_and_keeps_previous_display() {
        let coord = Coordinator::new(composer(), Box::new(FlakyPanel { failures: 1 }), None);

        let err = coord.submit(quote("lost")).unwrap_err();
        match err {
            SubmitError::Failed(e) => assert_eq!(e.stage(), Stage::Hardware),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(coord.status(), DisplayStatus::Idle);
        assert!(coord.currently_displayed().is_none());
        assert_eq!(coord.renders(), 0);

        coord.submit(quote("kept")).unwrap();
        assert_eq!(coord.currently_displayed().unwrap().job, quote("kept"));
        assert_eq!(coord.renders(), 1);
    }

    #[test]
    fn layout_failure_is_reported_with_its_stage() {
        let settings = LayoutSettings {
            padding: 500,
            ..LayoutSettings::default()
        };
        let composer = Composer::new(400, 300, FontSet::default(), settings);
        let coord = Coordinator::new(composer, Box::new(HeadlessPanel::new()), None);

        match coord.submit(quote("x")) {
            Err(SubmitError::Failed(e)) => assert_eq!(e.stage(), Stage::Layout),
            other => panic!("expected layout failure, got {other:?}"),
        }
        assert_eq!(coord.status(), DisplayStatus::Idle);
    }

    #[test]
    fn panic_inside_pipeline_still_releases_busy() {
        let coord = Coordinator::new(composer(), Box::new(PanickingPanel), None);

        let result = panic::catch_unwind(AssertUnwindSafe(|| coord.submit(quote("boom"))));
        assert!(result.is_err());
        assert_eq!(coord.status(), DisplayStatus::Idle);
    }

    #[test]
    fn preview_is_saved_after_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img/inkyscreen.png");
        let coord = Coordinator::new(
            composer(),
            Box::new(HeadlessPanel::new()),
            Some(path.clone()),
        );

        coord.submit(quote("preview me")).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn unwritable_preview_does_not_fail_the_render() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let coord = Coordinator::new(
            composer(),
            Box::new(HeadlessPanel::new()),
            Some(blocker.join("inkyscreen.png")),
        );

        coord.submit(quote("still shown")).unwrap();
        assert!(coord.currently_displayed().is_some());
    }
}
