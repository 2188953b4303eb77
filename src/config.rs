//! Flat configuration surface (R1, §6). One named field per knob, no
//! dynamic/type-indexed lookup (§9).

use anyhow::{bail, Result};

use crate::bugfix::default_patterns;
use crate::cli::ConfigArgs;
use crate::coupling::CouplingOptions;
use crate::score::{CommitScoreWeights, FileScoreWeights, RiskThresholds};

#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub file_weights: FileScoreWeights,
    pub half_life_days: f64,
    pub burst_window_days: f64,
    pub bugfix_patterns: Vec<String>,
    pub commit_weights: CommitScoreWeights,
    pub risk_thresholds: RiskThresholds,
    pub coupling: CouplingOptions,
    pub legacy_years: i64,
    pub max_hotspots: usize,
    pub default_branch: String,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            file_weights: FileScoreWeights::default(),
            half_life_days: 30.0,
            burst_window_days: 7.0,
            bugfix_patterns: default_patterns(),
            commit_weights: CommitScoreWeights::default(),
            risk_thresholds: RiskThresholds::default(),
            coupling: CouplingOptions::default(),
            legacy_years: 3,
            max_hotspots: 100,
            default_branch: "HEAD".to_string(),
        }
    }
}

impl From<&ConfigArgs> for RiskConfig {
    /// Build a [`RiskConfig`] from CLI flags, falling back to the standard
    /// bugfix pattern set when `--bugfix-pattern` was not given at all
    /// (an explicitly empty list is not expressible from the CLI today).
    fn from(args: &ConfigArgs) -> Self {
        let bugfix_patterns = if args.bugfix_patterns.is_empty() {
            default_patterns()
        } else {
            args.bugfix_patterns.clone()
        };

        Self {
            file_weights: FileScoreWeights {
                commit: args.w_commit,
                churn: args.w_churn,
                recency: args.w_recency,
                burst: args.w_burst,
                ownership: args.w_ownership,
                bugfix: args.w_bugfix,
                complexity: args.w_complexity,
            },
            half_life_days: args.half_life_days,
            burst_window_days: args.burst_window_days,
            bugfix_patterns,
            commit_weights: CommitScoreWeights {
                diffusion: args.cw_diffusion,
                size: args.cw_size,
                entropy: args.cw_entropy,
            },
            risk_thresholds: RiskThresholds {
                high: args.risk_high,
                medium: args.risk_medium,
            },
            coupling: CouplingOptions {
                min_co_commits: args.min_co_commits,
                min_jaccard: args.min_jaccard,
                max_files_per_commit: args.max_files_per_commit,
                top_pairs: args.top_pairs,
            },
            legacy_years: args.legacy_years,
            max_hotspots: args.max_hotspots,
            default_branch: args.default_branch.clone(),
        }
    }
}

impl RiskConfig {
    /// Fail fast on non-positive numerics before any reader I/O begins
    /// (§4.15/§7). Regex and glob validity are checked where those values
    /// are actually compiled (`BugfixDetector::new`, `PathFilter::new`).
    pub fn validate(&self) -> Result<()> {
        if self.half_life_days <= 0.0 {
            bail!("half_life_days must be positive, got {}", self.half_life_days);
        }
        if self.burst_window_days <= 0.0 {
            bail!("burst_window_days must be positive, got {}", self.burst_window_days);
        }
        if self.legacy_years <= 0 {
            bail!("legacy_years must be positive, got {}", self.legacy_years);
        }
        if self.max_hotspots == 0 {
            bail!("max_hotspots must be positive");
        }
        if self.coupling.min_jaccard < 0.0 || self.coupling.min_jaccard > 1.0 {
            bail!("min_jaccard must be within [0, 1], got {}", self.coupling.min_jaccard);
        }
        if self.coupling.max_files_per_commit == 0 {
            bail!("max_files_per_commit must be positive");
        }
        if self.coupling.top_pairs == 0 {
            bail!("top_pairs must be positive");
        }
        Ok(())
    }
}
