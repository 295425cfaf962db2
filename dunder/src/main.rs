use clap::Parser;
use tracing_subscriber::EnvFilter;

mod deck;
mod opts;
mod vector;

use opts::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.log.as_deref() {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = dunder_rt::Runtime::new();

    tracing::debug!("[main] {:?}", rt.builtins);

    match cli.command {
        Command::Deck {
            sample,
            choose,
            sorted,
        } => deck::run(&rt, sample, choose, sorted)?,
        Command::Vector => vector::run(&rt)?,
    }

    Ok(())
}
