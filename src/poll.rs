//! Background triggers.
//!
//! Two dedicated threads: one re-fetches the feeds and swaps the result
//! into the [`Rotation`], the other advances the rotation and submits the
//! article to the [`Coordinator`].  Manual renders use a short-lived
//! thread of their own.  All of them report to the UI thread over an
//! [`mpsc`] channel.
//!
//! ## For contributors
//!
//! The threads loop forever and stop on their own once the receiver is
//! dropped: every send doubles as a liveness check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::render::{Coordinator, RenderJob};
use crate::rotation::Rotation;
use crate::source::{self, DataSource, FeedSet};

/// Messages sent from the background threads to the UI thread.
#[derive(Debug)]
pub enum PollMsg {
    /// A refresh produced this feed set (already handed to the rotation).
    Feeds(Arc<FeedSet>),
    /// A source failed; description includes the source name.
    FetchError(String),
    /// This job is now on the panel.
    Rendered(RenderJob),
    /// The display was busy; the job was dropped.
    Busy(RenderJob),
    /// The job was accepted but did not reach the panel.
    RenderFailed(String),
}

/// Submit `job` and describe the outcome as a [`PollMsg`].
pub fn render(coordinator: &Coordinator, job: RenderJob) -> PollMsg {
    match coordinator.submit(job.clone()) {
        Ok(()) => PollMsg::Rendered(job),
        Err(e) if e.is_retryable() => PollMsg::Busy(job),
        Err(e) => PollMsg::RenderFailed(e.to_string()),
    }
}

/// Advance the rotation once and render the article it lands on.
///
/// `None` when there is nothing to rotate through.
pub fn rotate_once(rotation: &Rotation, coordinator: &Coordinator) -> Option<PollMsg> {
    let job = rotation.advance()?;
    let msg = render(coordinator, job);
    if let PollMsg::Busy(job) = &msg {
        debug!(title = job.headline(), "display busy, rotation skipped");
    }
    Some(msg)
}

/// Render `job` on a fresh thread so the caller never waits on the panel.
pub fn render_in_background(coordinator: Arc<Coordinator>, job: RenderJob, tx: Sender<PollMsg>) {
    thread::spawn(move || {
        let msg = render(&coordinator, job);
        let _ = tx.send(msg);
    });
}

/// Advance the rotation and render on a fresh thread.
pub fn rotate_in_background(
    rotation: Arc<Rotation>,
    coordinator: Arc<Coordinator>,
    tx: Sender<PollMsg>,
) {
    thread::spawn(move || {
        if let Some(msg) = rotate_once(&rotation, &coordinator) {
            let _ = tx.send(msg);
        }
    });
}

/// Fetch every source now and then every `every`, feeding the rotation.
pub fn spawn_refresh(
    sources: Vec<Box<dyn DataSource>>,
    rotation: Arc<Rotation>,
    every: Duration,
    tx: Sender<PollMsg>,
) {
    thread::spawn(move || loop {
        let (feeds, errors) = source::fetch_all(&sources);

        for e in errors {
            if tx.send(PollMsg::FetchError(e)).is_err() {
                return;
            }
        }
        match feeds {
            Some(feeds) => {
                rotation.refresh(feeds);
                if tx.send(PollMsg::Feeds(rotation.snapshot())).is_err() {
                    return;
                }
            }
            None => warn!("every source failed, keeping previous feeds"),
        }

        thread::sleep(every);
    });
}

/// Every `every`, advance the rotation and render, unless `enabled` is
/// cleared.
pub fn spawn_rotation(
    rotation: Arc<Rotation>,
    coordinator: Arc<Coordinator>,
    enabled: Arc<AtomicBool>,
    every: Duration,
    tx: Sender<PollMsg>,
) {
    thread::spawn(move || loop {
        thread::sleep(every);

        if !enabled.load(Ordering::Relaxed) {
            debug!("rotation paused");
            continue;
        }
        if let Some(msg) = rotate_once(&rotation, &coordinator) {
            if tx.send(msg).is_err() {
                info!("status page gone, rotation stopped");
                return;
            }
        }
    });
}

/// Create the channel the triggers report on.
pub fn channel() -> (Sender<PollMsg>, mpsc::Receiver<PollMsg>) {
    mpsc::channel()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::error::HardwareWriteError;
    use crate::render::{Composer, FontSet, HeadlessPanel, LayoutSettings, Panel};
    use crate::source::{Article, Feed};
    use std::sync::mpsc::Receiver;

    fn composer() -> Composer {
        Composer::new(400, 300, FontSet::default(), LayoutSettings::default())
    }

    fn coordinator() -> Arc<Coordinator> {
        Arc::new(Coordinator::new(composer(), Box::new(HeadlessPanel::new()), None))
    }

    fn two_articles() -> Rotation {
        let rotation = Rotation::new();
        rotation.refresh(FeedSet::new(vec![Feed::new(
            "f",
            vec![Article::new("A", ""), Article::new("B", "")],
        )]));
        rotation
    }

    /// Blocks each refresh until the test releases it.
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

    struct OneFeed;

    impl DataSource for OneFeed {
        fn name(&self) -> &str {
            "one"
        }

        fn fetch(&self) -> anyhow::Result<Feed> {
            Ok(Feed::new("One", vec![Article::new("Only story", "Details")]))
        }
    }

    #[test]
    fn rotate_once_renders_the_next_article() {
        let rotation = two_articles();
        let coord = coordinator();

        let msg = rotate_once(&rotation, &coord).unwrap();
        assert!(matches!(msg, PollMsg::Rendered(ref job) if job.headline() == "A"));
        assert_eq!(coord.currently_displayed().unwrap().job.headline(), "A");
    }

    #[test]
    fn busy_display_skips_the_rotation_tick_and_the_next_one_renders() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let panel = GatedPanel {
            entered: entered_tx,
            release: release_rx,
        };
        let coord = Arc::new(Coordinator::new(composer(), Box::new(panel), None));
        let rotation = two_articles();

        let (tx, rx) = channel();
        render_in_background(
            Arc::clone(&coord),
            RenderJob::Quote {
                text: "MANUAL".into(),
            },
            tx,
        );
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        match rotate_once(&rotation, &coord) {
            Some(PollMsg::Busy(job)) => assert_eq!(job.headline(), "A"),
            other => panic!("expected busy, got {other:?}"),
        }

        release_tx.send(()).unwrap();
        let manual = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(manual, PollMsg::Rendered(RenderJob::Quote { .. })));

        release_tx.send(()).unwrap();
        match rotate_once(&rotation, &coord) {
            Some(PollMsg::Rendered(job)) => assert_eq!(job.headline(), "B"),
            other => panic!("expected render, got {other:?}"),
        }
        assert_eq!(coord.currently_displayed().unwrap().job.headline(), "B");
    }

    #[test]
    fn enabled_rotation_thread_renders_on_its_tick() {
        let rotation = Arc::new(two_articles());
        let coord = coordinator();
        let (tx, rx) = channel();

        spawn_rotation(
            Arc::clone(&rotation),
            Arc::clone(&coord),
            Arc::new(AtomicBool::new(true)),
            Duration::from_millis(10),
            tx,
        );

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            PollMsg::Rendered(job) => assert_eq!(job.headline(), "A"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(coord.currently_displayed().is_some());
    }

    #[test]
    fn rotate_once_without_articles_does_nothing() {
        let coord = coordinator();
        assert!(rotate_once(&Rotation::new(), &coord).is_none());
        assert!(coord.currently_displayed().is_none());
    }

    #[test]
    fn refresh_thread_feeds_the_rotation() {
        let rotation = Arc::new(Rotation::new());
        let (tx, rx) = channel();
        spawn_refresh(
            vec![Box::new(OneFeed)],
            Arc::clone(&rotation),
            Duration::from_secs(3600),
            tx,
        );

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match msg {
            PollMsg::Feeds(set) => assert_eq!(set.total_entries(), 1),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(rotation.snapshot().total_entries(), 1);
    }

    #[test]
    fn background_render_reports_back() {
        let (tx, rx) = channel();
        render_in_background(
            coordinator(),
            RenderJob::Quote {
                text: "HELLO".into(),
            },
            tx,
        );

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(msg, PollMsg::Rendered(RenderJob::Quote { .. })));
    }

    #[test]
    fn paused_rotation_renders_nothing() {
        let rotation = Arc::new(Rotation::new());
        rotation.refresh(FeedSet::new(vec![Feed::new("f", vec![Article::new("A", "")])]));
        let coord = coordinator();
        let (tx, rx) = channel();

        spawn_rotation(
            Arc::clone(&rotation),
            Arc::clone(&coord),
            Arc::new(AtomicBool::new(false)),
            Duration::from_millis(10),
            tx,
        );

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert!(coord.currently_displayed().is_none());
    }
}
