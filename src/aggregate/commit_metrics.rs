//! Commit-metric calculator (C8): per-commit diffusion, size, and entropy
//! features.

use std::collections::HashSet;

use crate::entropy::change_entropy;
use crate::model::{CommitChangeSet, CommitMetrics};

fn split_path(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

/// Lowercased parent-directory component of `path`, or `None` for a
/// repository-root file.
fn dirname(path: &str) -> Option<String> {
    let parts = split_path(path);
    if parts.len() <= 1 {
        return None;
    }
    Some(parts[..parts.len() - 1].join("/").to_lowercase())
}

/// Lowercased first path segment ("subsystem"), or `None` for a
/// repository-root file.
fn first_segment(path: &str) -> Option<String> {
    split_path(path).first().map(|s| s.to_lowercase())
}

/// Compute diffusion/size/entropy features for one change-set.
pub fn compute(change_set: &CommitChangeSet) -> CommitMetrics {
    let file_count = change_set.changes.len();

    let directories: HashSet<String> = change_set
        .changes
        .iter()
        .filter_map(|c| dirname(&c.path))
        .collect();

    let subsystems: HashSet<String> = change_set
        .changes
        .iter()
        .filter_map(|c| first_segment(&c.path))
        .collect();
    let subsystem_count = subsystems.len().max(1);

    let lines_added = change_set.changes.iter().map(|c| c.lines_added).sum();
    let lines_deleted = change_set.changes.iter().map(|c| c.lines_deleted).sum();

    CommitMetrics {
        commit_id: change_set.commit.id.clone(),
        when: change_set.commit.when,
        author: change_set.commit.author.clone(),
        short_message: change_set.commit.short_message.clone(),
        file_count,
        directory_count: directories.len(),
        subsystem_count,
        lines_added,
        lines_deleted,
        change_entropy: change_entropy(&change_set.changes),
    }
}

/// Compute metrics for an entire change-set stream.
pub fn compute_all(change_sets: &[CommitChangeSet]) -> Vec<CommitMetrics> {
    change_sets.iter().map(compute).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, ChangeKind, CommitInfo, FileChange};
    use chrono::{FixedOffset, TimeZone};

    fn change(path: &str) -> FileChange {
        FileChange {
            path: path.into(),
            old_path: None,
            lines_added: 1,
            lines_deleted: 0,
            kind: ChangeKind::Modified,
        }
    }

    fn set(changes: Vec<FileChange>) -> CommitChangeSet {
        let when = FixedOffset::east_opt(0).unwrap().timestamp_opt(0, 0).unwrap();
        CommitChangeSet {
            commit: CommitInfo::new("c1", when, Author::new("a", "a@x.com"), "msg"),
            changes,
        }
    }

    #[test]
    fn root_only_changes_collapse_to_one_subsystem() {
        let cs = set(vec![change("README.md"), change("Cargo.toml")]);
        let m = compute(&cs);
        assert_eq!(m.directory_count, 0);
        assert_eq!(m.subsystem_count, 1);
    }

    #[test]
    fn nested_paths_count_directories_and_subsystems() {
        let cs = set(vec![
            change("src/core/a.rs"),
            change("src/core/b.rs"),
            change("docs/readme.md"),
        ]);
        let m = compute(&cs);
        assert_eq!(m.directory_count, 2); // src/core, docs
        assert_eq!(m.subsystem_count, 2); // src, docs
    }

    #[test]
    fn backslash_separators_are_accepted() {
        let cs = set(vec![change(r"src\core\a.rs")]);
        let m = compute(&cs);
        assert_eq!(m.directory_count, 1);
        assert_eq!(m.subsystem_count, 1);
    }

    #[test]
    fn directory_and_subsystem_are_lowercased() {
        let cs = set(vec![change("SRC/Core/A.rs")]);
        let m = compute(&cs);
        let cs2 = set(vec![change("src/core/a.rs")]);
        let m2 = compute(&cs2);
        assert_eq!(m.directory_count, m2.directory_count);
        assert_eq!(m.subsystem_count, m2.subsystem_count);
    }

    #[test]
    fn lines_are_summed() {
        let mut changes = vec![change("a.rs"), change("b.rs")];
        changes[0].lines_added = 3;
        changes[1].lines_added = 7;
        let cs = set(changes);
        let m = compute(&cs);
        assert_eq!(m.lines_added, 10);
    }
}
