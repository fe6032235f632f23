use anyhow::Result;
use clap::Parser;
use tmcs_dwg::{handle_cli_args, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    handle_cli_args(&cli).await
}
