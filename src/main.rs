mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use huffpack::Config;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli, config)
}
