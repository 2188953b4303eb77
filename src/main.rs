use clap::Parser;
use riskspots::cli::{Cli, Commands};
use riskspots::commands::{Global, Runnable};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let global = Global { json: cli.json };

    let result = match cli.command {
        Commands::Hotspots(cmd) => cmd.run(&global),
        Commands::Commits(cmd) => cmd.run(&global),
        Commands::Coupling(cmd) => cmd.run(&global),
        Commands::Legacy(cmd) => cmd.run(&global),
        Commands::Calibrate(cmd) => cmd.run(&global),
    };

    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}
