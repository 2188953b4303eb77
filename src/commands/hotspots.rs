use anyhow::Result;
use clap::Args;

use crate::cli::{ConfigArgs, HistoryArgs};
use crate::commands::{common, Global};
use crate::config::RiskConfig;
use crate::presentation::table;
use crate::score::score_files;

#[derive(Debug, Args)]
pub struct Hotspots {
    #[command(flatten)]
    pub history: HistoryArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(short = 'n', long, default_value_t = 20)]
    pub top: usize,

    #[arg(long)]
    pub explain: bool,
}

impl super::Runnable for Hotspots {
    fn run(self, g: &Global) -> Result<()> {
        let config = RiskConfig::from(&self.config);
        config.validate()?;

        let bundle = common::build_bundle(&config, &self.history, true)?;
        let until = common::effective_until(&self.history);

        let mut results = score_files(
            &bundle.file_metrics,
            &config.file_weights,
            config.half_life_days,
            until,
            self.explain,
        );
        results.truncate(self.top);

        if g.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else if results.is_empty() {
            println!("no commits in the requested window");
        } else {
            println!("{}", table::file_scores(&results));
        }
        Ok(())
    }
}
