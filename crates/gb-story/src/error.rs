//! Error types for story loading.

use std::path::PathBuf;

use serde::Serialize;

use crate::choice::PageId;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that stop page data from loading at all.
///
/// Problems inside individual pages or choices never surface here; they are
/// collected as [`ContentIssue`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// The page file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The page data is not valid JSON.
    #[error("invalid page data: {0}")]
    Json(#[from] serde_json::Error),

    /// The top level is not an object keyed by page number.
    #[error("page data must be a JSON object keyed by page number")]
    NotAnObject,

    /// No bundled copy exists for this language.
    #[error("unknown language: {0} (expected en or pt)")]
    UnknownLanguage(String),
}

/// What kind of content problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A page entry was dropped.
    SkippedPage,
    /// A choice was dropped.
    SkippedChoice,
    /// A `requires` key that is not evaluated.
    UnknownRequires,
    /// An effect that will fail when applied.
    InvalidEffect,
    /// A key or value that was ignored.
    Ignored,
    /// A `goto` to a page that does not exist.
    DanglingGoto,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SkippedPage => "skipped page",
            Self::SkippedChoice => "skipped choice",
            Self::UnknownRequires => "unknown requires key",
            Self::InvalidEffect => "invalid effect",
            Self::Ignored => "ignored",
            Self::DanglingGoto => "dangling goto",
        };
        f.write_str(label)
    }
}

/// A problem found while loading content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentIssue {
    /// Page the problem is on, if known.
    pub page: Option<PageId>,
    /// 1-based choice position on that page.
    pub choice: Option<usize>,
    /// Category.
    pub kind: IssueKind,
    /// Details.
    pub message: String,
}

impl std::fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.page, self.choice) {
            (Some(p), Some(c)) => write!(f, "page {p}, choice {c}: ")?,
            (Some(p), None) => write!(f, "page {p}: ")?,
            _ => {}
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Issues gathered while parsing one page or choice.
#[derive(Debug, Default)]
pub(crate) struct Notes {
    pub(crate) items: Vec<(IssueKind, String)>,
}

impl Notes {
    pub(crate) fn push(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.items.push((kind, message.into()));
    }
}
