use anyhow::Result;
use chrono::Duration;
use clap::Args;

use crate::bugfix::BugfixDetector;
use crate::cli::{ConfigArgs, HistoryArgs};
use crate::commands::{common, Global};
use crate::config::RiskConfig;
use crate::legacy::legacy_hotspots;
use crate::presentation::table;

#[derive(Debug, Args)]
pub struct Legacy {
    #[command(flatten)]
    pub history: HistoryArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl super::Runnable for Legacy {
    fn run(self, g: &Global) -> Result<()> {
        let config = RiskConfig::from(&self.config);
        config.validate()?;

        let change_sets = common::read_history(&self.history, &config)?;
        let detector = BugfixDetector::new(&config.bugfix_patterns)?;
        let detection = detector.detect(&change_sets);

        let until = common::effective_until(&self.history);
        let since = until - Duration::days(365 * config.legacy_years);

        let hotspots = legacy_hotspots(&change_sets, &detection.bugfix_commits, since, until, config.max_hotspots);

        if g.json {
            println!("{}", serde_json::to_string_pretty(&hotspots)?);
        } else if hotspots.is_empty() {
            println!("no bugfix commits in the requested window");
        } else {
            println!("{}", table::legacy_hotspots(&hotspots));
        }
        Ok(())
    }
}
