use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::author::Author;

/// Aggregated, per-file change metrics.
///
/// Owned exclusively by the file aggregator (C7); scorers only ever borrow
/// it immutably. The ownership ratio is lazily computed and cached; any
/// mutation that touches `contributor_commit_counts` must invalidate the
/// cache via [`FileMetrics::invalidate_ownership_cache`].
#[derive(Debug, Serialize, Deserialize)]
pub struct FileMetrics {
    pub commit_count: u64,
    pub added_lines: u64,
    pub deleted_lines: u64,
    pub last_modified_at: Option<DateTime<FixedOffset>>,
    pub contributors: HashSet<String>,
    pub contributor_commit_counts: HashMap<String, u64>,
    /// Retained only when burst analysis was requested at aggregator
    /// construction; `None` otherwise to bound memory (§5).
    pub commit_times: Option<Vec<DateTime<FixedOffset>>>,
    pub burst_score: f64,
    pub bugfix_count: u64,
    pub file_size: u64,

    #[serde(skip)]
    cached_ownership_ratio: Cell<Option<f64>>,
}

impl Clone for FileMetrics {
    fn clone(&self) -> Self {
        Self {
            commit_count: self.commit_count,
            added_lines: self.added_lines,
            deleted_lines: self.deleted_lines,
            last_modified_at: self.last_modified_at,
            contributors: self.contributors.clone(),
            contributor_commit_counts: self.contributor_commit_counts.clone(),
            commit_times: self.commit_times.clone(),
            burst_score: self.burst_score,
            bugfix_count: self.bugfix_count,
            file_size: self.file_size,
            cached_ownership_ratio: Cell::new(self.cached_ownership_ratio.get()),
        }
    }
}

impl Default for FileMetrics {
    fn default() -> Self {
        Self {
            commit_count: 0,
            added_lines: 0,
            deleted_lines: 0,
            last_modified_at: None,
            contributors: HashSet::new(),
            contributor_commit_counts: HashMap::new(),
            commit_times: None,
            burst_score: 0.0,
            bugfix_count: 0,
            file_size: 0,
            cached_ownership_ratio: Cell::new(None),
        }
    }
}

impl FileMetrics {
    /// A fresh record, retaining per-commit timestamps iff `track_times`.
    pub fn new(track_times: bool) -> Self {
        let mut m = Self::default();
        if track_times {
            m.commit_times = Some(Vec::new());
        }
        m
    }

    pub fn churn_total(&self) -> u64 {
        self.added_lines + self.deleted_lines
    }

    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }

    /// Invalidate the cached ownership ratio; call after any mutation to
    /// `contributor_commit_counts` or `commit_count`.
    pub fn invalidate_ownership_cache(&self) {
        self.cached_ownership_ratio.set(None);
    }

    /// `max(contributor_commit_counts) / commit_count`, `1.0` when
    /// `commit_count == 0`. Lazily computed and cached.
    pub fn ownership_ratio(&self) -> f64 {
        if let Some(cached) = self.cached_ownership_ratio.get() {
            return cached;
        }
        let ratio = if self.commit_count == 0 {
            1.0
        } else {
            let top = self
                .contributor_commit_counts
                .values()
                .copied()
                .max()
                .unwrap_or(0);
            top as f64 / self.commit_count as f64
        };
        self.cached_ownership_ratio.set(Some(ratio));
        ratio
    }

    /// Fold another record's aggregate data into `self` (used when
    /// reconciling a rename). `self` is assumed to be the surviving
    /// (newer-path) record.
    pub fn merge_from(&mut self, other: &FileMetrics) {
        self.commit_count += other.commit_count;
        self.added_lines += other.added_lines;
        self.deleted_lines += other.deleted_lines;
        self.last_modified_at = match (self.last_modified_at, other.last_modified_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, None) => a,
            (None, b) => b,
        };
        self.contributors.extend(other.contributors.iter().cloned());
        for (key, count) in &other.contributor_commit_counts {
            *self.contributor_commit_counts.entry(key.clone()).or_insert(0) += count;
        }
        match (&mut self.commit_times, &other.commit_times) {
            (Some(times), Some(other_times)) => times.extend(other_times.iter().copied()),
            (slot @ None, Some(other_times)) => *slot = Some(other_times.clone()),
            _ => {}
        }
        self.bugfix_count += other.bugfix_count;
        self.invalidate_ownership_cache();
    }
}

/// Aggregated, per-commit diffusion/size/entropy metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMetrics {
    pub commit_id: String,
    pub when: DateTime<FixedOffset>,
    pub author: Author,
    pub short_message: String,
    pub file_count: usize,
    pub directory_count: usize,
    pub subsystem_count: usize,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub change_entropy: f64,
}

impl CommitMetrics {
    pub fn total_churn(&self) -> u64 {
        self.lines_added + self.lines_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_ratio_is_one_when_no_commits() {
        let m = FileMetrics::new(false);
        assert_eq!(m.ownership_ratio(), 1.0);
    }

    #[test]
    fn ownership_ratio_is_cached_until_invalidated() {
        let mut m = FileMetrics::new(false);
        m.commit_count = 4;
        m.contributor_commit_counts.insert("a@x.com".into(), 3);
        m.contributor_commit_counts.insert("b@x.com".into(), 1);
        assert_eq!(m.ownership_ratio(), 0.75);

        // mutate without invalidating: stale cached value still returned
        m.contributor_commit_counts.insert("a@x.com".into(), 4);
        assert_eq!(m.ownership_ratio(), 0.75);

        m.invalidate_ownership_cache();
        assert_eq!(m.ownership_ratio(), 1.0);
    }

    #[test]
    fn merge_from_sums_counts_and_unions_contributors() {
        let mut a = FileMetrics::new(true);
        a.commit_count = 2;
        a.added_lines = 10;
        a.contributor_commit_counts.insert("x@y.com".into(), 2);
        a.contributors.insert("x@y.com".into());

        let mut b = FileMetrics::new(true);
        b.commit_count = 1;
        b.added_lines = 5;
        b.contributor_commit_counts.insert("z@y.com".into(), 1);
        b.contributors.insert("z@y.com".into());

        a.merge_from(&b);
        assert_eq!(a.commit_count, 3);
        assert_eq!(a.added_lines, 15);
        assert_eq!(a.contributor_count(), 2);
    }
}
