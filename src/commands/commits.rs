use anyhow::Result;
use clap::Args;

use crate::cli::{ConfigArgs, HistoryArgs, RiskFilterArg};
use crate::commands::{common, Global};
use crate::config::RiskConfig;
use crate::presentation::table;
use crate::score::{filter_by_risk_level, score_commits, RiskFilter};

#[derive(Debug, Args)]
pub struct Commits {
    #[command(flatten)]
    pub history: HistoryArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(short = 'n', long, default_value_t = 20)]
    pub top: usize,

    #[arg(long, value_enum, default_value_t = RiskFilterArg::All)]
    pub risk: RiskFilterArg,
}

fn to_risk_filter(arg: RiskFilterArg) -> RiskFilter {
    match arg {
        RiskFilterArg::All => RiskFilter::All,
        RiskFilterArg::HighAndMedium => RiskFilter::HighAndMedium,
        RiskFilterArg::HighOnly => RiskFilter::HighOnly,
    }
}

impl super::Runnable for Commits {
    fn run(self, g: &Global) -> Result<()> {
        let config = RiskConfig::from(&self.config);
        config.validate()?;

        let bundle = common::build_bundle(&config, &self.history, false)?;

        let scored = score_commits(&bundle.commit_metrics, &config.commit_weights, &config.risk_thresholds);
        let mut filtered = filter_by_risk_level(&scored, to_risk_filter(self.risk));
        filtered.truncate(self.top);

        if g.json {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        } else if filtered.is_empty() {
            println!("no commits in the requested window");
        } else {
            println!("{}", table::commit_scores(&filtered));
        }
        Ok(())
    }
}
