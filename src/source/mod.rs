//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the feed model
//! ([`Article`], [`Feed`], [`FeedSet`]).  Concrete source implementations
//! live in sub-modules (currently only [`rss`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct (e.g. `AtomSource`) and implement [`DataSource`] for it.
//! 3. Add `mod atom;` below and re-export your struct in the `pub use` block.
//! 4. Build it from config in `main.rs` and add it to the `sources` vec.
//!
//! The refresh loop, rotation, and renderer never look at where a feed
//! came from.

mod article;
mod rss;

pub use article::{Article, Feed, FeedSet};
pub use rss::RssSource;

use anyhow::Result;
use tracing::{info, warn};

/// Trait that every data source must implement.
///
/// The refresh loop calls [`fetch()`](DataSource::fetch) periodically on a
/// background thread, so implementations must be [`Send`].
pub trait DataSource: Send {
    /// Human-readable label shown in logs and on the status page.
    fn name(&self) -> &str;

    /// Fetch the latest version of this feed.
    fn fetch(&self) -> Result<Feed>;
}

/// Fetch every source once and assemble a new [`FeedSet`].
///
/// Sources that fail are logged and left out.  Returns the set together
/// with the per-source error descriptions; the set is `None` only when no
/// source succeeded, so the caller keeps whatever it had before.
pub fn fetch_all(sources: &[Box<dyn DataSource>]) -> (Option<FeedSet>, Vec<String>) {
    let mut feeds = Vec::with_capacity(sources.len());
    let mut errors = Vec::new();

    for src in sources {
        match src.fetch() {
            Ok(feed) => {
                info!(source = src.name(), entries = feed.entries.len(), "fetched feed");
                feeds.push(feed);
            }
            Err(e) => {
                warn!(source = src.name(), error = %e, "feed fetch failed");
                errors.push(format!("{}: {e}", src.name()));
            }
        }
    }

    if feeds.is_empty() && !sources.is_empty() {
        return (None, errors);
    }
    (Some(FeedSet::new(feeds)), errors)
}
