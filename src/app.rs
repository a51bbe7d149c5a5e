use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use ratatui::widgets::ListState;

use crate::poll::{self, PollMsg};
use crate::render::{Coordinator, RenderJob};
use crate::rotation::Rotation;
use crate::source::FeedSet;

/// What keystrokes currently mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scrolling the article list.
    Browse,
    /// Typing a quote for the panel.
    Compose,
}

/// Shared handles the status page drives.
#[derive(Clone)]
pub struct Handles {
    pub coordinator: Arc<Coordinator>,
    pub rotation: Arc<Rotation>,
    pub rotation_enabled: Arc<AtomicBool>,
    pub tx: Sender<PollMsg>,
}

pub struct App {
    /// Latest feed set, as last reported by the refresh thread.
    pub feeds: Arc<FeedSet>,
    /// Selection in the flattened article list.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    pub mode: Mode,
    /// Quote being typed in [`Mode::Compose`].
    pub input: String,
    handles: Handles,
    uppercase: bool,
}

impl App {
    pub fn new(handles: Handles, uppercase: bool) -> Self {
        Self {
            feeds: handles.rotation.snapshot(),
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            mode: Mode::Browse,
            input: String::new(),
            handles,
            uppercase,
        }
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.handles.coordinator
    }

    pub fn rotation_enabled(&self) -> bool {
        self.handles.rotation_enabled.load(Ordering::Relaxed)
    }

    /// Position the rotation will show next, wrapped to the current list.
    pub fn rotation_cursor(&self) -> usize {
        match self.feeds.total_entries() {
            0 => 0,
            total => self.handles.rotation.cursor() % total,
        }
    }

    /// Apply one message from the background threads.
    pub fn handle_msg(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Feeds(feeds) => {
                self.status = format!(
                    "Fetched {} articles from {} feeds",
                    feeds.total_entries(),
                    feeds.feeds().len()
                );
                self.feeds = feeds;
                self.clamp_selection();
            }
            PollMsg::FetchError(e) => self.status = format!("Error: {e}"),
            PollMsg::Rendered(job) => self.status = format!("Displayed: {}", job.headline()),
            PollMsg::Busy(_) => self.status = "Display busy, try again shortly".into(),
            PollMsg::RenderFailed(e) => self.status = format!("Render failed: {e}"),
        }
    }

    fn clamp_selection(&mut self) {
        let total = self.feeds.total_entries();
        match self.list_state.selected() {
            Some(_) if total == 0 => self.list_state.select(None),
            Some(i) if i >= total => self.list_state.select(Some(total - 1)),
            _ => {}
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let total = self.feeds.total_entries();
        if total == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.feeds.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.feeds.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let total = self.feeds.total_entries();
        if total > 0 {
            self.list_state.select(Some(total - 1));
        }
    }

    // -- panel actions -------------------------------------------------------

    /// Pause or resume the timed rotation.
    pub fn toggle_rotation(&mut self) {
        let was = self.handles.rotation_enabled.fetch_xor(true, Ordering::Relaxed);
        self.status = if was {
            "Rotation paused".into()
        } else {
            "Rotation resumed".into()
        };
    }

    /// Show the next article in the rotation now.
    pub fn rotate_now(&mut self) {
        if self.feeds.is_empty() {
            self.status = "No articles yet".into();
            return;
        }
        self.status = "Rendering next article…".into();
        poll::rotate_in_background(
            Arc::clone(&self.handles.rotation),
            Arc::clone(&self.handles.coordinator),
            self.handles.tx.clone(),
        );
    }

    /// Show the highlighted article now.  Does not move the rotation.
    pub fn render_selected(&mut self) {
        let Some(article) = self
            .list_state
            .selected()
            .and_then(|i| self.feeds.article(i))
        else {
            self.status = "Nothing selected".into();
            return;
        };
        let job = RenderJob::from(article);
        self.status = format!("Rendering: {}", job.headline());
        self.submit(job);
    }

    // -- quote entry ---------------------------------------------------------

    pub fn start_compose(&mut self) {
        self.mode = Mode::Compose;
        self.input.clear();
    }

    pub fn cancel_compose(&mut self) {
        self.mode = Mode::Browse;
        self.input.clear();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Send the typed text to the panel as a quote.
    pub fn submit_compose(&mut self) {
        let Some(job) = RenderJob::manual_quote(&self.input, self.uppercase) else {
            self.status = "Nothing to render".into();
            return;
        };
        self.mode = Mode::Browse;
        self.input.clear();
        self.status = "Rendering quote…".into();
        self.submit(job);
    }

    fn submit(&self, job: RenderJob) {
        poll::render_in_background(
            Arc::clone(&self.handles.coordinator),
            job,
            self.handles.tx.clone(),
        );
    }
}
