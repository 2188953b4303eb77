//! File scorer (C9): seven-factor weighted composite score, ranked
//! descending.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::model::FileMetrics;
use crate::normalize::{norm_log, recency_decay, Range};

/// Weights for the seven scoring components. Not normalized by the scorer
/// (§4.8) — the caller/calibrator is responsible for any `Σw = 1`
/// discipline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileScoreWeights {
    pub commit: f64,
    pub churn: f64,
    pub recency: f64,
    pub burst: f64,
    pub ownership: f64,
    pub bugfix: f64,
    pub complexity: f64,
}

impl FileScoreWeights {
    pub const COUNT: usize = 7;

    /// As a fixed-order array, matching the calibrator's feature vector
    /// layout `[commit, churn, recency, burst, ownership, bugfix,
    /// complexity]`.
    pub fn as_array(&self) -> [f64; Self::COUNT] {
        [
            self.commit,
            self.churn,
            self.recency,
            self.burst,
            self.ownership,
            self.bugfix,
            self.complexity,
        ]
    }

    pub fn from_array(a: [f64; Self::COUNT]) -> Self {
        Self {
            commit: a[0],
            churn: a[1],
            recency: a[2],
            burst: a[3],
            ownership: a[4],
            bugfix: a[5],
            complexity: a[6],
        }
    }
}

impl Default for FileScoreWeights {
    /// Equal seventh-share weights, matching the calibrator's starting
    /// point (§4.12).
    fn default() -> Self {
        Self::from_array([1.0 / 7.0; Self::COUNT])
    }
}

/// Per-component contribution breakdown, attached when `explain = true`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FileScoreComponents {
    pub commit: f64,
    pub churn: f64,
    pub recency: f64,
    pub burst: f64,
    pub ownership: f64,
    pub bugfix: f64,
    pub complexity: f64,
}

/// Min/max context ranges across the metrics set being scored, computed in
/// one pass. Empty input yields all-zero ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileScoreContext {
    pub commit_count_range: Range,
    pub churn_range: Range,
    pub bugfix_range: Range,
    pub file_size_range: Range,
}

impl FileScoreContext {
    pub fn compute(metrics: &HashMap<String, FileMetrics>) -> Self {
        if metrics.is_empty() {
            let zero = Range::new(0.0, 0.0);
            return Self {
                commit_count_range: zero,
                churn_range: zero,
                bugfix_range: zero,
                file_size_range: zero,
            };
        }

        let mut commit_min = f64::MAX;
        let mut commit_max = f64::MIN;
        let mut churn_min = f64::MAX;
        let mut churn_max = f64::MIN;
        let mut bugfix_min = f64::MAX;
        let mut bugfix_max = f64::MIN;
        let mut size_min = f64::MAX;
        let mut size_max = f64::MIN;

        for m in metrics.values() {
            let commit_count = m.commit_count as f64;
            let churn = m.churn_total() as f64;
            let bugfix = m.bugfix_count as f64;
            let size = m.file_size as f64;

            commit_min = commit_min.min(commit_count);
            commit_max = commit_max.max(commit_count);
            churn_min = churn_min.min(churn);
            churn_max = churn_max.max(churn);
            bugfix_min = bugfix_min.min(bugfix);
            bugfix_max = bugfix_max.max(bugfix);
            size_min = size_min.min(size);
            size_max = size_max.max(size);
        }

        Self {
            commit_count_range: Range::new(commit_min, commit_max),
            churn_range: Range::new(churn_min, churn_max),
            bugfix_range: Range::new(bugfix_min, bugfix_max),
            file_size_range: Range::new(size_min, size_max),
        }
    }
}

/// One file's composite score, optionally annotated with the component
/// breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileScoreResult {
    pub path: String,
    pub score: f64,
    pub components: Option<FileScoreComponents>,
}

/// Compute the seven raw `[0,1]` components for one file. Exposed publicly
/// so the calibrator (C13) can build the same feature matrix the scorer
/// would without duplicating the normalization logic.
pub fn compute_components(
    path_metrics: &FileMetrics,
    ctx: &FileScoreContext,
    half_life_days: f64,
    until: DateTime<FixedOffset>,
) -> FileScoreComponents {
    let recency = match path_metrics.last_modified_at {
        Some(last) => {
            let days = (until - last).num_seconds() as f64 / 86_400.0;
            recency_decay(days, half_life_days)
        }
        None => 0.0,
    };

    FileScoreComponents {
        commit: norm_log(path_metrics.commit_count as f64, ctx.commit_count_range),
        churn: norm_log(path_metrics.churn_total() as f64, ctx.churn_range),
        recency,
        burst: path_metrics.burst_score,
        ownership: 1.0 - path_metrics.ownership_ratio(),
        bugfix: norm_log(path_metrics.bugfix_count as f64, ctx.bugfix_range),
        complexity: norm_log(path_metrics.file_size as f64, ctx.file_size_range),
    }
}

fn dot(weights: &FileScoreWeights, components: &FileScoreComponents) -> f64 {
    weights.commit * components.commit
        + weights.churn * components.churn
        + weights.recency * components.recency
        + weights.burst * components.burst
        + weights.ownership * components.ownership
        + weights.bugfix * components.bugfix
        + weights.complexity * components.complexity
}

/// Score every file in `metrics`, returning results sorted strictly
/// descending by score. Ties break by path ascending (an explicit,
/// documented resolution to the open tie-breaking question in §8).
pub fn score_files(
    metrics: &HashMap<String, FileMetrics>,
    weights: &FileScoreWeights,
    half_life_days: f64,
    until: DateTime<FixedOffset>,
    explain: bool,
) -> Vec<FileScoreResult> {
    let ctx = FileScoreContext::compute(metrics);

    let mut results: Vec<FileScoreResult> = metrics
        .iter()
        .map(|(path, m)| {
            let components = compute_components(m, &ctx, half_life_days, until);
            let score = dot(weights, &components);
            FileScoreResult {
                path: path.clone(),
                score,
                components: explain.then_some(components),
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn until() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().timestamp_opt(10_000_000, 0).unwrap()
    }

    fn metric(commit_count: u64, churn: u64, last_modified_secs: i64) -> FileMetrics {
        let mut m = FileMetrics::new(false);
        m.commit_count = commit_count;
        m.added_lines = churn;
        m.last_modified_at = Some(FixedOffset::east_opt(0).unwrap().timestamp_opt(last_modified_secs, 0).unwrap());
        m.contributor_commit_counts.insert("a@x.com".into(), commit_count);
        m.contributors.insert("a@x.com".into());
        m
    }

    #[test]
    fn scores_are_bounded_for_uniform_weights() {
        let mut metrics = HashMap::new();
        metrics.insert("a.rs".to_string(), metric(10, 100, 9_900_000));
        metrics.insert("b.rs".to_string(), metric(1, 1, 0));

        let weights = FileScoreWeights::default();
        let results = score_files(&metrics, &weights, 30.0, until(), false);
        for r in &results {
            assert!(r.score >= 0.0 && r.score <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn results_sorted_strictly_descending() {
        let mut metrics = HashMap::new();
        metrics.insert("hot.rs".to_string(), metric(50, 500, 9_999_000));
        metrics.insert("cold.rs".to_string(), metric(1, 1, 0));

        let weights = FileScoreWeights::default();
        let results = score_files(&metrics, &weights, 30.0, until(), false);
        assert_eq!(results[0].path, "hot.rs");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn explain_attaches_components() {
        let mut metrics = HashMap::new();
        metrics.insert("a.rs".to_string(), metric(5, 50, 9_000_000));
        let weights = FileScoreWeights::default();
        let results = score_files(&metrics, &weights, 30.0, until(), true);
        assert!(results[0].components.is_some());

        let results_noexplain = score_files(&metrics, &weights, 30.0, until(), false);
        assert!(results_noexplain[0].components.is_none());
    }

    #[test]
    fn empty_metrics_context_is_zero_range() {
        let metrics: HashMap<String, FileMetrics> = HashMap::new();
        let ctx = FileScoreContext::compute(&metrics);
        assert_eq!(ctx.commit_count_range, Range::new(0.0, 0.0));
    }

    #[test]
    fn ties_break_by_path_ascending() {
        let mut metrics = HashMap::new();
        metrics.insert("z.rs".to_string(), FileMetrics::new(false));
        metrics.insert("a.rs".to_string(), FileMetrics::new(false));
        let weights = FileScoreWeights::from_array([0.0; 7]);
        let results = score_files(&metrics, &weights, 30.0, until(), false);
        assert_eq!(results[0].path, "a.rs");
        assert_eq!(results[1].path, "z.rs");
    }
}
