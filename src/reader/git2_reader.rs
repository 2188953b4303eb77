//! Concrete `HistoryReader` (R2), following the teacher's
//! `domain/churn.rs` revwalk + `Patch::line_stats` pattern.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{Delta, DiffFindOptions, DiffOptions, Patch, Repository, Sort};

use crate::model::{Author, ChangeKind, CommitChangeSet, CommitInfo, FileChange};
use crate::pathfilter::PathFilter;

use super::{CancelToken, DetailLevel, HistoryReader, ReaderError, ReaderOptions, RenameMode};

pub struct Git2Reader {
    options: ReaderOptions,
    filter: PathFilter,
}

impl Git2Reader {
    pub fn new(options: ReaderOptions) -> Result<Self> {
        let filter = PathFilter::new(&options.include, &options.exclude)?;
        Ok(Self { options, filter })
    }
}

fn to_fixed_offset(time: git2::Time) -> DateTime<FixedOffset> {
    let offset_seconds = time.offset_minutes() * 60;
    let tz = FixedOffset::east_opt(offset_seconds).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    tz.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(|| tz.timestamp_opt(0, 0).unwrap())
}

fn diff_find_options(options: &ReaderOptions) -> DiffOptions {
    let mut diff_opts = DiffOptions::new();
    diff_opts.include_unmodified(false);
    if matches!(options.rename_mode, RenameMode::Off) {
        diff_opts.renames(false);
    }
    diff_opts
}

fn apply_rename_detection(diff: &mut git2::Diff, options: &ReaderOptions) -> Result<()> {
    match options.rename_mode {
        RenameMode::Off => Ok(()),
        RenameMode::Exact => {
            let mut find_opts = DiffFindOptions::new();
            find_opts.renames(true);
            find_opts.exact_match_only(true);
            diff.find_similar(Some(&mut find_opts))
                .context("failed to run exact rename detection")
        }
        RenameMode::Similarity => {
            let mut find_opts = DiffFindOptions::new();
            find_opts.renames(true);
            find_opts.rename_threshold(options.similarity_threshold as u16);
            diff.find_similar(Some(&mut find_opts))
                .context("failed to run similarity rename detection")
        }
    }
}

fn change_kind(delta: Delta) -> Option<ChangeKind> {
    match delta {
        Delta::Added | Delta::Copied => Some(ChangeKind::Added),
        Delta::Modified | Delta::Typechange => Some(ChangeKind::Modified),
        Delta::Deleted => Some(ChangeKind::Deleted),
        Delta::Renamed => Some(ChangeKind::Renamed),
        // Unreadable/Unmodified/Ignored/Untracked/Conflicted never appear in
        // a tree-to-tree diff between two commits.
        _ => None,
    }
}

impl Git2Reader {
    fn build_change_set(&self, repo: &Repository, commit: &git2::Commit) -> Result<CommitChangeSet> {
        let author_sig = commit.author();
        let author = Author::new(
            author_sig.name().unwrap_or("").to_string(),
            author_sig.email().unwrap_or("").to_string(),
        );
        let when = to_fixed_offset(commit.time());
        let id = commit.id().to_string();
        let message = commit.message().unwrap_or("");
        let info = CommitInfo::new(id, when, author, message);

        let parent = commit.parent(0).context("commit has no parent (should be filtered upstream)")?;
        let parent_tree = parent.tree().context("failed to read parent tree")?;
        let tree = commit.tree().context("failed to read commit tree")?;

        let mut diff_opts = diff_find_options(&self.options);
        let mut diff = repo
            .diff_tree_to_tree(Some(&parent_tree), Some(&tree), Some(&mut diff_opts))
            .context("failed to diff commit against parent")?;
        apply_rename_detection(&mut diff, &self.options)?;

        let mut changes = Vec::new();
        for (delta_idx, delta) in diff.deltas().enumerate() {
            let Some(kind) = change_kind(delta.status()) else {
                continue;
            };

            let new_path = delta.new_file().path().and_then(|p| p.to_str());
            let old_path = delta.old_file().path().and_then(|p| p.to_str());
            let path = new_path.or(old_path).map(str::to_string);
            let Some(path) = path else { continue };

            if !self.filter.matches(&path) {
                continue;
            }

            let (lines_added, lines_deleted) = match self.options.detail {
                DetailLevel::PathsOnly => (0, 0),
                DetailLevel::Full => match Patch::from_diff(&diff, delta_idx) {
                    Ok(Some(patch)) => {
                        let (_ctx, adds, dels) = patch.line_stats().unwrap_or((0, 0, 0));
                        (adds as u64, dels as u64)
                    }
                    _ => (0, 0),
                },
            };

            let old_path = if kind == ChangeKind::Renamed {
                old_path.map(str::to_string)
            } else {
                None
            };

            changes.push(FileChange {
                path,
                old_path,
                lines_added,
                lines_deleted,
                kind,
            });
        }

        Ok(CommitChangeSet { commit: info, changes })
    }
}

impl HistoryReader for Git2Reader {
    fn read_changes(&self, cancel: &dyn CancelToken) -> Result<Vec<CommitChangeSet>> {
        let repo = Repository::discover(&self.options.repo_path)
            .with_context(|| format!("cannot open repo at {}", self.options.repo_path))?;

        let mut walk = repo.revwalk().context("failed to start revwalk")?;
        if self.options.revision.is_empty() {
            walk.push_head().context("failed to push HEAD onto revwalk")?;
        } else {
            let obj = repo
                .revparse_single(&self.options.revision)
                .with_context(|| format!("invalid revision: {}", self.options.revision))?;
            walk.push(obj.id()).context("failed to push revision onto revwalk")?;
        }
        walk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)
            .context("failed to configure revwalk sort order")?;

        let mut result = Vec::new();
        for oid in walk {
            if cancel.is_cancelled() {
                return Err(ReaderError::Cancelled.into());
            }
            let oid = oid.context("failed to read commit id from revwalk")?;
            let commit = repo.find_commit(oid).context("failed to resolve commit")?;

            // Merge commits and root commits are excluded at this boundary
            // (§3): only a single-parent commit yields a meaningful diff.
            if commit.parent_count() != 1 {
                continue;
            }

            let when = to_fixed_offset(commit.time());
            if let Some(since) = self.options.since {
                if when < since {
                    continue;
                }
            }
            if let Some(until) = self.options.until {
                if when > until {
                    continue;
                }
            }

            let change_set = self.build_change_set(&repo, &commit)?;
            result.push(change_set);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        dir
    }

    /// Write `path`, stage it, and commit directly through the git2 write
    /// API (tree builder + `Repository::commit`), mirroring how the pack's
    /// git-backed tools build throwaway fixtures without shelling out.
    fn commit_file(dir: &TempDir, path: &str, contents: &str, message: &str) {
        let repo = Repository::open(dir.path()).unwrap();
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, contents).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new(path)).unwrap();
        index.write().unwrap();
        let tree_oid = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_oid).unwrap();

        let sig = repo.signature().unwrap();
        let parents = match repo.head().ok().and_then(|h| h.peel_to_commit().ok()) {
            Some(parent) => vec![parent],
            None => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs).unwrap();
    }

    fn delete_file(dir: &TempDir, path: &str, message: &str) {
        let repo = Repository::open(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join(path)).unwrap();

        let mut index = repo.index().unwrap();
        index.remove_path(std::path::Path::new(path)).unwrap();
        index.write().unwrap();
        let tree_oid = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_oid).unwrap();

        let sig = repo.signature().unwrap();
        let parent = repo.head().unwrap().peel_to_commit().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent]).unwrap();
    }

    #[test]
    fn reads_add_modify_delete_sequence() {
        let dir = init_repo();
        commit_file(&dir, "a.rs", "fn a() {}\n", "add a");
        commit_file(&dir, "a.rs", "fn a() { 1; }\n", "modify a");
        delete_file(&dir, "a.rs", "delete a");

        let options = ReaderOptions {
            repo_path: dir.path().to_string_lossy().to_string(),
            ..ReaderOptions::default()
        };
        let reader = Git2Reader::new(options).unwrap();
        let sets = reader.read_changes(&super::super::NeverCancel).unwrap();

        // root commit (add a) is excluded at the boundary: only the modify
        // and delete commits have exactly one parent.
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].changes[0].kind, ChangeKind::Modified);
        assert_eq!(sets[1].changes[0].kind, ChangeKind::Deleted);
    }

    #[test]
    fn paths_only_detail_reports_zero_line_stats() {
        let dir = init_repo();
        commit_file(&dir, "a.rs", "line one\n", "add a");
        commit_file(&dir, "a.rs", "line one\nline two\n", "modify a");

        let options = ReaderOptions {
            repo_path: dir.path().to_string_lossy().to_string(),
            detail: DetailLevel::PathsOnly,
            ..ReaderOptions::default()
        };
        let reader = Git2Reader::new(options).unwrap();
        let sets = reader.read_changes(&super::super::NeverCancel).unwrap();
        assert_eq!(sets[0].changes[0].lines_added, 0);
    }

    #[test]
    fn empty_window_yields_empty_result_not_error() {
        let dir = init_repo();
        commit_file(&dir, "a.rs", "fn a() {}\n", "add a");
        commit_file(&dir, "a.rs", "fn a() { 1; }\n", "modify a");

        let far_future = FixedOffset::east_opt(0).unwrap().timestamp_opt(9_999_999_999, 0).unwrap();
        let options = ReaderOptions {
            repo_path: dir.path().to_string_lossy().to_string(),
            since: Some(far_future),
            ..ReaderOptions::default()
        };
        let reader = Git2Reader::new(options).unwrap();
        let sets = reader.read_changes(&super::super::NeverCancel).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn include_filter_restricts_emitted_changes() {
        let dir = init_repo();
        commit_file(&dir, "a.rs", "1\n", "add a");
        commit_file(&dir, "a.rs", "1\n2\n", "modify a+readme");
        commit_file(&dir, "README.md", "docs\n", "add docs");

        let options = ReaderOptions {
            repo_path: dir.path().to_string_lossy().to_string(),
            include: vec!["*.rs".to_string()],
            ..ReaderOptions::default()
        };
        let reader = Git2Reader::new(options).unwrap();
        let sets = reader.read_changes(&super::super::NeverCancel).unwrap();
        for set in &sets {
            for change in &set.changes {
                assert!(change.path.ends_with(".rs"));
            }
        }
    }
}
