use anyhow::Result;
use clap::Args;

use crate::cli::{ConfigArgs, HistoryArgs};
use crate::commands::{common, Global};
use crate::config::RiskConfig;
use crate::coupling::analyze;
use crate::presentation::table;

#[derive(Debug, Args)]
pub struct Coupling {
    #[command(flatten)]
    pub history: HistoryArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl super::Runnable for Coupling {
    fn run(self, g: &Global) -> Result<()> {
        let config = RiskConfig::from(&self.config);
        config.validate()?;

        let bundle = common::build_bundle(&config, &self.history, false)?;
        let pairs = analyze(&bundle.change_sets, &config.coupling);

        if g.json {
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        } else if pairs.is_empty() {
            println!("no coupled file pairs met the configured thresholds");
        } else {
            println!("{}", table::coupling_pairs(&pairs));
        }
        Ok(())
    }
}
