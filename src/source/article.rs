//! The feed model shared by every data source and by the rotation.
//!
//! A [`FeedSet`] is the unit the refresh timer hands over: it is built in
//! full by the fetch side and then swapped in wholesale, never edited in
//! place.  That is why nothing here exposes `&mut` access once built.

use chrono::{DateTime, Utc};

/// A single feed entry, normalised from any data source.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Article {
    /// Headline.
    pub title: String,

    /// Short summary text shown under the headline on the panel.
    ///
    /// Empty when the source did not provide one.
    pub summary: String,

    /// URL to the full content, if the source gave one.
    pub link: Option<String>,

    /// Publication timestamp.  Only used by the status page.
    pub published: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            link: None,
            published: None,
        }
    }
}

/// One feed and its entries, in the order the source listed them.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Feed {
    pub title: String,
    pub entries: Vec<Article>,
}

impl Feed {
    pub fn new(title: impl Into<String>, entries: Vec<Article>) -> Self {
        Self {
            title: title.into(),
            entries,
        }
    }
}

/// Every configured feed, in configuration order.
///
/// The rotation addresses articles through the *flattened* view: all
/// feeds' entries concatenated in feed order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FeedSet {
    feeds: Vec<Feed>,
}

impl FeedSet {
    pub fn new(feeds: Vec<Feed>) -> Self {
        Self { feeds }
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    /// Number of articles across all feeds.
    pub fn total_entries(&self) -> usize {
        self.feeds.iter().map(|f| f.entries.len()).sum()
    }

    /// Iterate the flattened article list.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.feeds.iter().flat_map(|f| f.entries.iter())
    }

    /// Article at `index` in the flattened list.
    pub fn article(&self, index: usize) -> Option<&Article> {
        self.articles().nth(index)
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
