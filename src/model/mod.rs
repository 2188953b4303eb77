pub mod author;
pub mod commit;
pub mod metrics;

pub use author::Author;
pub use commit::{ChangeKind, CommitChangeSet, CommitInfo, FileChange, SHORT_MESSAGE_MAX};
pub use metrics::{CommitMetrics, FileMetrics};
