//! Commit scorer (C10): three-factor JIT score with risk classification.

use serde::{Deserialize, Serialize};

use crate::model::CommitMetrics;
use crate::normalize::{clamp, norm_log, Range};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitScoreWeights {
    pub diffusion: f64,
    pub size: f64,
    pub entropy: f64,
}

impl Default for CommitScoreWeights {
    fn default() -> Self {
        Self {
            diffusion: 0.35,
            size: 0.35,
            entropy: 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskThresholds {
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Context ranges over the commit-metrics set being scored, one pass.
#[derive(Debug, Clone, Copy)]
struct CommitScoreContext {
    file_count_range: Range,
    directory_count_range: Range,
    subsystem_count_range: Range,
    churn_range: Range,
}

impl CommitScoreContext {
    fn compute(metrics: &[CommitMetrics]) -> Self {
        if metrics.is_empty() {
            let zero = Range::new(0.0, 0.0);
            return Self {
                file_count_range: zero,
                directory_count_range: zero,
                subsystem_count_range: zero,
                churn_range: zero,
            };
        }

        let mut file_min = f64::MAX;
        let mut file_max = f64::MIN;
        let mut dir_min = f64::MAX;
        let mut dir_max = f64::MIN;
        let mut sub_min = f64::MAX;
        let mut sub_max = f64::MIN;
        let mut churn_min = f64::MAX;
        let mut churn_max = f64::MIN;

        for m in metrics {
            let fc = m.file_count as f64;
            let dc = m.directory_count as f64;
            let sc = m.subsystem_count as f64;
            let churn = m.total_churn() as f64;

            file_min = file_min.min(fc);
            file_max = file_max.max(fc);
            dir_min = dir_min.min(dc);
            dir_max = dir_max.max(dc);
            sub_min = sub_min.min(sc);
            sub_max = sub_max.max(sc);
            churn_min = churn_min.min(churn);
            churn_max = churn_max.max(churn);
        }

        Self {
            file_count_range: Range::new(file_min, file_max),
            directory_count_range: Range::new(dir_min, dir_max),
            subsystem_count_range: Range::new(sub_min, sub_max),
            churn_range: Range::new(churn_min, churn_max),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitScoreResult {
    pub commit_id: String,
    pub short_message: String,
    pub score: f64,
    pub risk_level: RiskLevel,
    pub diffusion: f64,
    pub size: f64,
    pub entropy: f64,
}

/// Score every commit, sorted strictly descending by score. Ties break by
/// commit id ascending (documented resolution to §8's open tie-break
/// question).
pub fn score_commits(
    metrics: &[CommitMetrics],
    weights: &CommitScoreWeights,
    thresholds: &RiskThresholds,
) -> Vec<CommitScoreResult> {
    let ctx = CommitScoreContext::compute(metrics);

    let mut results: Vec<CommitScoreResult> = metrics
        .iter()
        .map(|m| {
            let diffusion = (norm_log(m.file_count as f64, ctx.file_count_range)
                + norm_log(m.directory_count as f64, ctx.directory_count_range)
                + norm_log(m.subsystem_count as f64, ctx.subsystem_count_range))
                / 3.0;
            let size = norm_log(m.total_churn() as f64, ctx.churn_range);
            let entropy = m.change_entropy;

            let score = clamp(
                weights.diffusion * diffusion + weights.size * size + weights.entropy * entropy,
            );

            CommitScoreResult {
                commit_id: m.commit_id.clone(),
                short_message: m.short_message.clone(),
                score,
                risk_level: thresholds.classify(score),
                diffusion,
                size,
                entropy,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.commit_id.cmp(&b.commit_id))
    });
    results
}

/// Which risk tiers to keep; order of the input slice is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFilter {
    HighOnly,
    HighAndMedium,
    All,
}

pub fn filter_by_risk_level(items: &[CommitScoreResult], filter: RiskFilter) -> Vec<CommitScoreResult> {
    items
        .iter()
        .filter(|item| match filter {
            RiskFilter::HighOnly => item.risk_level == RiskLevel::High,
            RiskFilter::HighAndMedium => {
                matches!(item.risk_level, RiskLevel::High | RiskLevel::Medium)
            }
            RiskFilter::All => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;
    use chrono::{FixedOffset, TimeZone};

    fn metric(id: &str, file_count: usize, dir_count: usize, sub_count: usize, churn: u64, entropy: f64) -> CommitMetrics {
        CommitMetrics {
            commit_id: id.to_string(),
            when: FixedOffset::east_opt(0).unwrap().timestamp_opt(0, 0).unwrap(),
            author: Author::new("a", "a@x.com"),
            short_message: "msg".to_string(),
            file_count,
            directory_count: dir_count,
            subsystem_count: sub_count,
            lines_added: churn,
            lines_deleted: 0,
            change_entropy: entropy,
        }
    }

    #[test]
    fn score_is_clamped_to_unit_interval() {
        let metrics = vec![
            metric("big", 50, 10, 5, 5000, 1.0),
            metric("small", 1, 0, 0, 0, 0.0),
        ];
        let results = score_commits(&metrics, &CommitScoreWeights::default(), &RiskThresholds::default());
        for r in &results {
            assert!(r.score >= 0.0 && r.score <= 1.0);
        }
    }

    #[test]
    fn risk_level_thresholds_classify_correctly() {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.classify(0.75), RiskLevel::High);
        assert_eq!(thresholds.classify(0.7), RiskLevel::High);
        assert_eq!(thresholds.classify(0.5), RiskLevel::Medium);
        assert_eq!(thresholds.classify(0.4), RiskLevel::Medium);
        assert_eq!(thresholds.classify(0.1), RiskLevel::Low);
    }

    #[test]
    fn filter_preserves_descending_score_order() {
        let metrics = vec![
            metric("a", 50, 10, 5, 5000, 1.0),
            metric("b", 20, 4, 2, 1000, 0.5),
            metric("c", 1, 0, 0, 0, 0.0),
        ];
        let results = score_commits(&metrics, &CommitScoreWeights::default(), &RiskThresholds::default());
        let high_and_medium = filter_by_risk_level(&results, RiskFilter::HighAndMedium);
        // order preserved: whichever entries survive stay in descending-score order
        for pair in high_and_medium.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn all_filter_returns_everything() {
        let metrics = vec![metric("a", 1, 0, 0, 0, 0.0)];
        let results = score_commits(&metrics, &CommitScoreWeights::default(), &RiskThresholds::default());
        assert_eq!(filter_by_risk_level(&results, RiskFilter::All).len(), 1);
    }
}
