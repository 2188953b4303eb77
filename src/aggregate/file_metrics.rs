//! File-metric aggregator (C7): folds an ordered change-set stream into
//! per-file feature records with rename reconciliation.
//!
//! Processing order (newest-first or oldest-first) must not affect the
//! result; see [`FileAggregator::apply_rename`] for how alias resolution
//! makes that true.

use std::collections::HashMap;

use crate::model::{ChangeKind, CommitChangeSet, FileMetrics};

/// Depth cap on alias-chain resolution; cycles are not expected to occur
/// (every alias points to a distinct canonical root) but the cap is a
/// defensive guard against them regardless.
const ALIAS_DEPTH_CAP: usize = 16;

/// Owns the metrics map and the rename-alias map exclusively; mutated only
/// through its own methods. Scorers consume the finished map read-only.
pub struct FileAggregator {
    metrics: HashMap<String, FileMetrics>,
    aliases: HashMap<String, String>,
    track_times: bool,
}

impl FileAggregator {
    /// `track_times` controls whether per-commit timestamps are retained
    /// for burst analysis; when burst is not requested this is `false` to
    /// bound memory (§5, §9).
    pub fn new(track_times: bool) -> Self {
        Self {
            metrics: HashMap::new(),
            aliases: HashMap::new(),
            track_times,
        }
    }

    /// Resolve `p` through the alias chain, capped at [`ALIAS_DEPTH_CAP`]
    /// hops.
    pub fn canonical_path(&self, p: &str) -> String {
        let mut current = p.to_string();
        for _ in 0..ALIAS_DEPTH_CAP {
            match self.aliases.get(&current) {
                Some(next) if next != &current => current = next.clone(),
                _ => return current,
            }
        }
        current
    }

    /// Reconcile a rename: merges any existing record for the old
    /// canonical path into the new one, deletes the old record, and
    /// records the alias so that changes arriving in either temporal
    /// order fold into the same surviving record.
    pub fn apply_rename(&mut self, old: &str, new: &str) {
        let o = self.canonical_path(old);
        let n = self.canonical_path(new);
        if o == n || o.is_empty() || n.is_empty() {
            return;
        }

        if !self.metrics.contains_key(&n) {
            self.metrics.insert(n.clone(), FileMetrics::new(self.track_times));
        }
        if let Some(old_record) = self.metrics.remove(&o) {
            let surviving = self.metrics.get_mut(&n).expect("just inserted above");
            surviving.merge_from(&old_record);
        }

        self.aliases.insert(o.clone(), n.clone());
        if old != o {
            self.aliases.insert(old.to_string(), n);
        }
    }

    /// Fold one change-set into the metrics map.
    pub fn ingest(&mut self, change_set: &CommitChangeSet) {
        for change in &change_set.changes {
            if change.kind == ChangeKind::Deleted {
                continue;
            }
            if change.kind == ChangeKind::Renamed {
                if let Some(old_path) = change.old_path.as_deref() {
                    if !old_path.is_empty() {
                        self.apply_rename(old_path, &change.path);
                    }
                }
            }

            let canonical = self.canonical_path(&change.path);
            let record = self
                .metrics
                .entry(canonical)
                .or_insert_with(|| FileMetrics::new(self.track_times));

            record.commit_count += 1;
            record.added_lines += change.lines_added;
            record.deleted_lines += change.lines_deleted;
            record.last_modified_at = Some(match record.last_modified_at {
                Some(existing) => existing.max(change_set.commit.when),
                None => change_set.commit.when,
            });

            let key = change_set.commit.author.contributor_key();
            record.contributors.insert(key.clone());
            *record.contributor_commit_counts.entry(key).or_insert(0) += 1;

            if let Some(times) = record.commit_times.as_mut() {
                times.push(change_set.commit.when);
            }

            record.invalidate_ownership_cache();
        }
    }

    /// Process an entire change-set stream (order-independent).
    pub fn process(mut self, change_sets: &[CommitChangeSet]) -> HashMap<String, FileMetrics> {
        for cs in change_sets {
            self.ingest(cs);
        }
        self.metrics
    }

    /// Fold bugfix counts (keyed by raw path) into the already-built
    /// metrics map, resolving each key through the alias map first.
    pub fn apply_bugfix_counts(
        metrics: &mut HashMap<String, FileMetrics>,
        aliases: &HashMap<String, String>,
        counts: &HashMap<String, u64>,
    ) {
        for (path, count) in counts {
            let canonical = resolve_alias(aliases, path);
            if let Some(record) = metrics.get_mut(&canonical) {
                record.bugfix_count += count;
            }
        }
    }

    /// Expose the alias map (used by callers needing to canonicalize
    /// external paths, e.g. the calibrator's bugfix oracle).
    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }
}

fn resolve_alias(aliases: &HashMap<String, String>, p: &str) -> String {
    let mut current = p.to_string();
    for _ in 0..ALIAS_DEPTH_CAP {
        match aliases.get(&current) {
            Some(next) if next != &current => current = next.clone(),
            _ => return current,
        }
    }
    current
}
