use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::author::Author;

/// Maximum length of a commit's short message, ellipsis included.
pub const SHORT_MESSAGE_MAX: usize = 100;

/// Truncate the first line of a commit message to [`SHORT_MESSAGE_MAX`]
/// characters, appending an ellipsis when truncated.
pub fn short_message(full_message: &str) -> String {
    let first_line = full_message.lines().next().unwrap_or("").trim();
    let chars: Vec<char> = first_line.chars().collect();
    if chars.len() <= SHORT_MESSAGE_MAX {
        return first_line.to_string();
    }
    let mut truncated: String = chars[..SHORT_MESSAGE_MAX.saturating_sub(1)].iter().collect();
    truncated.push('…');
    truncated
}

/// An immutable record describing one commit, independent of its file changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub when: DateTime<FixedOffset>,
    pub author: Author,
    pub short_message: String,
}

impl CommitInfo {
    pub fn new(id: impl Into<String>, when: DateTime<FixedOffset>, author: Author, message: &str) -> Self {
        Self {
            id: id.into(),
            when,
            author,
            short_message: short_message(message),
        }
    }
}

/// The kind of change a [`FileChange`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A single file's change within one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub old_path: Option<String>,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn churn(&self) -> u64 {
        self.lines_added + self.lines_deleted
    }

    /// `old_path` is non-empty iff `kind == Renamed`; this invariant is
    /// upheld by every constructor in the reader, but defensive callers can
    /// check it directly.
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            ChangeKind::Renamed => self.old_path.as_deref().is_some_and(|p| !p.is_empty()),
            _ => self.old_path.is_none(),
        }
    }
}

/// A commit paired with its ordered sequence of file changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitChangeSet {
    pub commit: CommitInfo,
    pub changes: Vec<FileChange>,
}
