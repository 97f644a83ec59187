use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::EngagemapConfig;
use crate::errors::{Error, Result};
use crate::impact::ImpactThresholds;
use crate::pipeline::YearFilter;

pub const CONFIG_FILE_NAME: &str = ".engagemap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse a config file's contents, replacing invalid sections with defaults.
///
/// Only a file that is not valid TOML (or has wrongly typed fields) is an
/// error; out-of-range values are reported and reset.
pub fn parse_and_validate_config(contents: &str) -> Result<EngagemapConfig> {
    let mut config = toml::from_str::<EngagemapConfig>(contents)
        .map_err(|e| Error::configuration(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;

    if let Err(e) = config.thresholds.validate() {
        warn!("Invalid impact thresholds: {e}. Using defaults.");
        config.thresholds = ImpactThresholds::default();
    }

    if config.display.page_size == 0 {
        warn!("display.page_size must be at least 1. Using default.");
        config.display = Default::default();
    }

    if config.artists.limit == 0 {
        warn!("artists.limit must be at least 1. Using default.");
        config.artists.limit = super::ArtistsConfig::default().limit;
    }

    if let Err(e) = config.artists.year.parse::<YearFilter>() {
        warn!("artists.year: {e}. Using all years.");
        config.artists.year = "all".to_string();
    }

    Ok(config)
}

/// Load a config file the user named explicitly. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<EngagemapConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::io("failed to read config file", path, e))?;
    let config = parse_and_validate_config(&contents)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<EngagemapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Absence is the common case while walking up.
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{e}. Using defaults.");
            None
        }
    }
}

/// `start` followed by its parents, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find `.engagemap.toml` in `start` or one of its ancestors.
pub fn discover_config(start: PathBuf) -> EngagemapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            EngagemapConfig::default()
        })
}

/// Discover the config from the working directory.
pub fn load_config() -> EngagemapConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            warn!("Failed to get current directory: {e}. Using default config.");
            EngagemapConfig::default()
        }
    }
}

/// Contents written by `engagemap init`.
pub fn default_config_toml() -> String {
    let thresholds = ImpactThresholds::default();
    let cuts = |c: [f64; 4]| {
        c.iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        r#"# engagemap configuration

# Directory containing data_tiktok.json, data_instagram.json and artist_stats.json
# data_dir = "public"

# Four ascending cut points per family; the five impact bands are
# [0, c1) [c1, c2) [c2, c3) [c3, c4) [c4, inf)
[thresholds.interaction_rate]
cuts = [{ir}]

[thresholds.views]
cuts = [{views}]

[thresholds.likes]
cuts = [{likes}]

[statistics]
# "upper_middle" picks sorted[n / 2]; "midpoint" averages the two middle values
median = "upper_middle"

[artists]
limit = 30
min_videos = 3
year = "all"

[display]
page_size = 50
"#,
        ir = cuts(thresholds.interaction_rate.cuts),
        views = cuts(thresholds.views.cuts),
        likes = cuts(thresholds.likes.cuts),
    )
}
