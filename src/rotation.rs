//! Cycling through the fetched articles.
//!
//! The held [`FeedSet`] is an `Arc` snapshot behind a lock: a refresh
//! swaps the whole `Arc`, readers clone it and never see a half-built set.
//! The cursor indexes the flattened article list and wraps on every
//! advance, so a refresh that shrinks the list cannot leave it out of range.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::render::RenderJob;
use crate::source::FeedSet;

#[derive(Default)]
pub struct Rotation {
    feeds: RwLock<Arc<FeedSet>>,
    cursor: Mutex<usize>,
}

impl Rotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held feed set.  The cursor is left alone.
    pub fn refresh(&self, feeds: FeedSet) {
        info!(
            feeds = feeds.feeds().len(),
            articles = feeds.total_entries(),
            "feed set replaced"
        );
        *self.feeds.write() = Arc::new(feeds);
    }

    /// The current feed set.
    pub fn snapshot(&self) -> Arc<FeedSet> {
        Arc::clone(&self.feeds.read())
    }

    /// Raw cursor value; may exceed the current article count until the
    /// next advance wraps it.
    pub fn cursor(&self) -> usize {
        *self.cursor.lock()
    }

    /// Take the article under the cursor and move the cursor on.
    ///
    /// Returns `None` when there are no articles.
    pub fn advance(&self) -> Option<RenderJob> {
        let mut cursor = self.cursor.lock();
        let feeds = self.snapshot();
        let total = feeds.total_entries();
        if total == 0 {
            info!("no articles to rotate");
            return None;
        }

        let index = *cursor % total;
        let article = feeds.article(index)?;
        *cursor = (index + 1) % total;
        debug!(index, total, title = %article.title, "rotation advanced");
        Some(RenderJob::from(article))
    }
}
