//! History reader contract (C5): the only interface between the core
//! analytical engine and the outside world.

pub mod git2_reader;

use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::model::CommitChangeSet;

/// `full` carries line-accurate add/delete counts; `paths_only` reports
/// every `FileChange` with zero line stats, cheaper for callers that only
/// need touch counts (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    PathsOnly,
    Full,
}

/// `Off` disables rename detection entirely (renames surface as a delete
/// + an add); `Exact` only folds content-identical moves; `Similarity`
/// additionally folds near-identical moves above a similarity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMode {
    Off,
    Exact,
    Similarity,
}

/// Construction-time options for a [`HistoryReader`]. Mirrors §6's
/// configuration surface exactly: repository location, revision, time
/// bounds, glob filters, detail level, rename mode.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub repo_path: String,
    /// Branch or revision selector; empty means the repository's default
    /// head.
    pub revision: String,
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub detail: DetailLevel,
    pub rename_mode: RenameMode,
    /// Similarity threshold in `[0, 100]`, only consulted when
    /// `rename_mode == Similarity`.
    pub similarity_threshold: u32,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            repo_path: ".".to_string(),
            revision: String::new(),
            since: None,
            until: None,
            include: Vec::new(),
            exclude: Vec::new(),
            detail: DetailLevel::Full,
            rename_mode: RenameMode::Similarity,
            similarity_threshold: 50,
        }
    }
}

/// The single typed distinction that matters at this boundary:
/// cancellation vs. every other failure. Everything else crosses as a
/// plain `anyhow::Error` with context (§4.15).
#[derive(Debug)]
pub enum ReaderError {
    Cancelled,
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Cancelled => write!(f, "history read cancelled"),
        }
    }
}

impl std::error::Error for ReaderError {}

/// Cooperative cancellation, checked once per commit in the revwalk loop
/// (§5: a coarse boundary, not per-delta).
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

/// A token that never cancels, for callers that don't need the feature
/// (CLI one-shot runs).
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// `read_changes(cancel_token) → stream of CommitChangeSet | error` (§6),
/// realized here as a buffered `Vec` return rather than a lazy stream:
/// C7/C8 need the full slice to run as independent passes (§5), so
/// nothing downstream benefits from incremental delivery.
pub trait HistoryReader {
    fn read_changes(&self, cancel: &dyn CancelToken) -> anyhow::Result<Vec<CommitChangeSet>>;
}
