pub mod commit_score;
pub mod file_score;

pub use commit_score::{
    filter_by_risk_level, score_commits, CommitScoreResult, CommitScoreWeights, RiskFilter,
    RiskLevel, RiskThresholds,
};
pub use file_score::{score_files, FileScoreComponents, FileScoreContext, FileScoreResult, FileScoreWeights};
