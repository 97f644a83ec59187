//! CLI command implementations.
//!
//! Report commands share one flow: load the config, open a [`Dashboard`]
//! over the data directory, replay the command's flags as actions, then
//! print the resulting [`Report`](crate::io::Report).
//!
//! Available commands:
//! - **summary**, **evolution**, **impact**, **distribution**: chart views
//! - **posts**: the filtered post table
//! - **artists**, **artist**: artist ranking and per-artist posts
//! - **years**: years present in the data
//! - **export**: monthly aggregates as CSV
//! - **init**: write a default `.engagemap.toml`

pub mod export;
pub mod init;
pub mod report;

pub use export::{export_csv, ExportTarget};
pub use init::init_config;
pub use report::{apply_overrides, build_report, command_actions};

use crate::cli::{Cli, Commands};
use crate::config::{load_config, load_config_from, EngagemapConfig};
use crate::formatting::FormattingConfig;
use crate::io::{create_writer, FileSource};
use crate::state::{reduce, Action, Dashboard};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::debug;

/// Config from `--config`, or the nearest `.engagemap.toml`.
pub fn resolve_config(cli: &Cli) -> Result<EngagemapConfig> {
    match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(load_config()),
    }
}

/// `--data-dir`, then the config's `data_dir`, then the working directory.
pub fn resolve_data_dir(cli: &Cli, config: &EngagemapConfig) -> PathBuf {
    cli.data_dir
        .clone()
        .or_else(|| config.data_dir().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Open a dashboard in the state `cli` asks for.
pub fn open_dashboard(cli: &Cli, config: &EngagemapConfig) -> Result<Dashboard<FileSource>> {
    let data_dir = resolve_data_dir(cli, config);
    debug!(data_dir = %data_dir.display(), platform = %cli.platform, "opening dashboard");

    let mut settings = config.settings();
    apply_overrides(&cli.command, &mut settings);

    let base = reduce(&config.initial_state(), Action::SetPlatform(cli.platform));
    let actions = command_actions(&cli.command, &base);

    // An unreadable document is logged and the reports render empty.
    let mut dashboard = Dashboard::open_or_empty(FileSource::new(&data_dir), settings, base)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    dashboard.dispatch_all(actions)?;
    Ok(dashboard)
}

/// Run every command except `init`.
pub fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let dashboard = open_dashboard(cli, &config)?;

    if let Commands::Export { output, stdout } = &cli.command {
        if dashboard.loaded_platform().is_none() {
            bail!(
                "No {} data loaded from {}; nothing to export",
                cli.platform.display_name(),
                resolve_data_dir(cli, &config).display()
            );
        }
        let target = if *stdout {
            ExportTarget::Stdout
        } else {
            ExportTarget::File(output.clone())
        };
        if let Some(path) = export_csv(&dashboard, &target)? {
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let formatting = cli
        .color
        .map(FormattingConfig::new)
        .unwrap_or_else(FormattingConfig::from_env);
    if let Some(report) = build_report(&cli.command, &dashboard) {
        create_writer(cli.format, formatting).write_report(&report)?;
    }
    Ok(())
}
