use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod errors;
mod metadata;
mod session;
mod storage;
#[cfg(test)]
mod tests;
mod video_id;
mod web;

use cli::Command;
use config::Config;
use metadata::Aggregator;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = cli::Args::parse();

    // pure commands, no config and no runtime needed
    if let Command::Id { url } = &args.command {
        return cli::handle_id(url);
    }

    let config = Config::load_with(config::base_path()?)?;
    let aggregator = Aggregator::from_config(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match args.command {
            Command::Id { .. } => Ok(()),
            Command::Fetch { url, report } => cli::handle_fetch(&aggregator, &url, report).await,
            Command::Thumbnails { url } => cli::handle_thumbnails(&config, &url),
            Command::Download { url, tier, output } => {
                cli::handle_download(&aggregator, &url, tier, output).await
            }
            Command::Daemon { listen } => cli::handle_daemon(aggregator, &config, listen).await,
        }
    })
}
