use std::collections::HashSet;

use anyhow::Result;
use clap::Args;

use crate::calibrate::calibrate;
use crate::cli::{ConfigArgs, HistoryArgs};
use crate::commands::{common, Global};
use crate::config::RiskConfig;

#[derive(Debug, Args)]
pub struct Calibrate {
    #[command(flatten)]
    pub history: HistoryArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, default_value_t = 20.0)]
    pub top_percent: f64,
}

impl super::Runnable for Calibrate {
    fn run(self, g: &Global) -> Result<()> {
        let config = RiskConfig::from(&self.config);
        config.validate()?;

        let bundle = common::build_bundle(&config, &self.history, true)?;
        let until = common::effective_until(&self.history);

        let oracle: HashSet<String> = bundle
            .file_metrics
            .iter()
            .filter(|(_, m)| m.bugfix_count > 0)
            .map(|(path, _)| path.clone())
            .collect();

        let recommended = calibrate(
            &bundle.file_metrics,
            &oracle,
            &config.file_weights,
            config.half_life_days,
            until,
            self.top_percent,
        );

        if g.json {
            println!("{}", serde_json::to_string_pretty(&recommended)?);
        } else {
            println!("recommended file-score weights (bugfix files: {}):", oracle.len());
            println!("  commit:     {:.2}", recommended.commit);
            println!("  churn:      {:.2}", recommended.churn);
            println!("  recency:    {:.2}", recommended.recency);
            println!("  burst:      {:.2}", recommended.burst);
            println!("  ownership:  {:.2}", recommended.ownership);
            println!("  bugfix:     {:.2}", recommended.bugfix);
            println!("  complexity: {:.2}", recommended.complexity);
        }
        Ok(())
    }
}
