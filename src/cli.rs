use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Mine git history for defect-prone files, commits, and change-coupled pairs
#[derive(Parser)]
#[command(
    name = "riskspots",
    version,
    about = "Mine git history for defect risk: hotspots, just-in-time commit risk, and change coupling",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
}

/// Options shared by every history-mining subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct HistoryArgs {
    /// Path to the Git repo
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Branch or revision to walk (default: repository HEAD)
    #[arg(short, long, default_value = "")]
    pub branch: String,

    /// Only include commits on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Only include commits on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Glob patterns to include (repeatable); default is everything
    #[arg(long = "include")]
    pub include: Vec<String>,

    /// Glob patterns to exclude (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,
}

/// Flags mirroring every knob of [`crate::config::RiskConfig`] (§6's
/// configuration surface), flattened into each scoring subcommand so the
/// documented defaults can all be overridden from the command line.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// File-score weight: commit frequency
    #[arg(long = "w-commit", default_value_t = 1.0 / 7.0)]
    pub w_commit: f64,

    /// File-score weight: churn
    #[arg(long = "w-churn", default_value_t = 1.0 / 7.0)]
    pub w_churn: f64,

    /// File-score weight: recency
    #[arg(long = "w-recency", default_value_t = 1.0 / 7.0)]
    pub w_recency: f64,

    /// File-score weight: burst
    #[arg(long = "w-burst", default_value_t = 1.0 / 7.0)]
    pub w_burst: f64,

    /// File-score weight: ownership
    #[arg(long = "w-ownership", default_value_t = 1.0 / 7.0)]
    pub w_ownership: f64,

    /// File-score weight: bugfix density
    #[arg(long = "w-bugfix", default_value_t = 1.0 / 7.0)]
    pub w_bugfix: f64,

    /// File-score weight: complexity (file size proxy)
    #[arg(long = "w-complexity", default_value_t = 1.0 / 7.0)]
    pub w_complexity: f64,

    /// Half-life, in days, for recency decay
    #[arg(long = "half-life-days", default_value_t = 30.0)]
    pub half_life_days: f64,

    /// Sliding-window width, in days, for burst density
    #[arg(long = "burst-window-days", default_value_t = 7.0)]
    pub burst_window_days: f64,

    /// Regex pattern identifying a bugfix commit message (repeatable);
    /// default is the standard fix/bug/hotfix/patch set
    #[arg(long = "bugfix-pattern")]
    pub bugfix_patterns: Vec<String>,

    /// Commit-score weight: diffusion (files/directories/subsystems touched)
    #[arg(long = "cw-diffusion", default_value_t = 0.35)]
    pub cw_diffusion: f64,

    /// Commit-score weight: size (total churn)
    #[arg(long = "cw-size", default_value_t = 0.35)]
    pub cw_size: f64,

    /// Commit-score weight: entropy (churn spread across touched files)
    #[arg(long = "cw-entropy", default_value_t = 0.30)]
    pub cw_entropy: f64,

    /// Commit risk-level threshold: High at or above this score
    #[arg(long = "risk-high", default_value_t = 0.7)]
    pub risk_high: f64,

    /// Commit risk-level threshold: Medium at or above this score
    #[arg(long = "risk-medium", default_value_t = 0.4)]
    pub risk_medium: f64,

    /// Minimum co-commit count for a file pair to be considered coupled
    #[arg(long = "min-co-commits", default_value_t = 3)]
    pub min_co_commits: u64,

    /// Minimum Jaccard coefficient for a coupled pair to be reported
    #[arg(long = "min-jaccard", default_value_t = 0.1)]
    pub min_jaccard: f64,

    /// Commits touching more files than this are skipped for pair enumeration
    #[arg(long = "max-files-per-commit", default_value_t = 50)]
    pub max_files_per_commit: usize,

    /// Maximum number of coupled pairs to report
    #[arg(long = "top-pairs", default_value_t = 50)]
    pub top_pairs: usize,

    /// Lookback window, in years, for the legacy Bugspots scorer
    #[arg(long = "years", default_value_t = 3)]
    pub legacy_years: i64,

    /// Maximum number of hotspots/pairs to report where applicable
    #[arg(long = "max-hotspots", default_value_t = 100)]
    pub max_hotspots: usize,

    /// Branch to use when `--branch` is not given
    #[arg(long = "default-branch", default_value = "HEAD")]
    pub default_branch: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank files by composite defect-risk score
    Hotspots(crate::commands::Hotspots),

    /// Rank recent commits by just-in-time risk score
    Commits(crate::commands::Commits),

    /// Report file pairs that tend to change together
    Coupling(crate::commands::Coupling),

    /// Run the original Bugspots sigmoid-weighted hotspot score
    Legacy(crate::commands::Legacy),

    /// Recommend file-score weights via coordinate descent against bugfix history
    Calibrate(crate::commands::Calibrate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RiskFilterArg {
    All,
    HighAndMedium,
    HighOnly,
}
