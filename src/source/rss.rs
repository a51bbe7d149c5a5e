//! RSS feed source implementation.
//!
//! Use it as a template when adding support for Atom, JSON Feed, or any
//! other format.

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::{Article, DataSource, Feed};

/// An RSS feed data source.
///
/// Fetches and parses an RSS 2.0 feed over HTTP using the [`rss`] crate.
pub struct RssSource {
    /// The feed URL to poll.
    pub url: String,
    /// A human-readable label; used as the feed title when the channel
    /// has none.
    pub label: String,
    /// Maximum number of entries kept from each fetch.
    pub max_entries: usize,
}

impl RssSource {
    /// Create a new RSS source.
    ///
    /// # Arguments
    ///
    /// * `url` — full URL of the RSS feed (e.g.
    ///   `https://feeds.bbci.co.uk/news/rss.xml`).
    /// * `label` — short name for logs and the status page.
    /// * `max_entries` — per-feed cap on the number of articles.
    pub fn new(url: impl Into<String>, label: impl Into<String>, max_entries: usize) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            max_entries,
        }
    }

    /// Parse an already-fetched [`rss::Channel`] into a [`Feed`].
    ///
    /// Pure function (no I/O) so tests can exercise it without the network.
    pub fn parse_channel(channel: &rss::Channel, label: &str, max_entries: usize) -> Feed {
        let title = if channel.title().trim().is_empty() {
            label.to_string()
        } else {
            channel.title().to_string()
        };

        let entries = channel
            .items()
            .iter()
            .take(max_entries)
            .map(|item| {
                // Parse RFC-2822 date; gracefully degrade to None on failure.
                let published = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                Article {
                    title: item.title().unwrap_or("(untitled)").trim().to_string(),
                    summary: item.description().unwrap_or_default().trim().to_string(),
                    link: item.link().map(String::from),
                    published,
                }
            })
            .collect();

        Feed { title, entries }
    }
}

impl DataSource for RssSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Feed> {
        let body = reqwest::blocking::get(&self.url)?
            .error_for_status()?
            .bytes()?;
        let channel = rss::Channel::read_from(body.as_ref())?;
        Ok(Self::parse_channel(&channel, &self.label, self.max_entries))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
