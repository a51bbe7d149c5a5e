//! The render pipeline: wrap → compose → palette-encode → panel.
//!
//! ```text
//!  RenderJob ──► Coordinator::submit ──► Composer ──► palette::encode ──► Panel
//!                   (busy gate)          (layout)     (3 colours)        (set_image/show)
//! ```
//!
//! Nothing outside [`Coordinator`] touches a [`Panel`].

mod canvas;
mod compose;
mod coordinator;
pub mod error;
mod fonts;
mod layout;
mod palette;
mod panel;

pub use compose::{Composer, LayoutSettings};
pub use coordinator::{Coordinator, DisplayStatus, Displayed};
pub use fonts::{font_by_name, FontSet, FONT_NAMES};
pub use panel::{HeadlessPanel, Panel};

use crate::source::Article;

/// One request to put something on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderJob {
    /// Free text, centred in a single block.
    Quote { text: String },
    /// A feed article: accent headline over an ink body.
    ArticleView { headline: String, body: String },
}

impl RenderJob {
    /// A quote from manually entered text.  `None` when the text is blank.
    pub fn manual_quote(text: &str, uppercase: bool) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let text = if uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        Some(RenderJob::Quote { text })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderJob::Quote { .. } => "quote",
            RenderJob::ArticleView { .. } => "article",
        }
    }

    /// One-line description for the status page.
    pub fn headline(&self) -> &str {
        match self {
            RenderJob::Quote { text } => text,
            RenderJob::ArticleView { headline, .. } => headline,
        }
    }
}

impl From<&Article> for RenderJob {
    fn from(article: &Article) -> Self {
        RenderJob::ArticleView {
            headline: article.title.clone(),
            body: article.summary.clone(),
        }
    }
}
