use anyhow::Result;
use clap::Parser;
use engagemap::cli::{Cli, Commands};
use engagemap::commands;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Init { force } => commands::init_config(*force),
        _ => commands::run(&cli),
    }
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so JSON and CSV on stdout stay clean. `RUST_LOG`
/// overrides the `-v` level.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("engagemap={}", default_level(verbose))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
