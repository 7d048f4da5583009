use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use taskz_cli::app::{App, start_route};
use taskz_cli::cli::Cli;
use taskz_cli::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load()?;
    config.override_base_url(cli.api_url.clone());

    init_tracing(&config.logging.level, cli.verbose)?;

    let app = App::new(&config, start_route(&cli.command))?;
    app.run(cli.command).await
}

fn init_tracing(level: &str, verbose: bool) -> Result<()> {
    let default = if verbose {
        "taskz_cli=debug,taskz_client=debug"
    } else {
        level
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}
