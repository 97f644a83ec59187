//! Optional `.engagemap.toml` configuration.
//!
//! Every section is optional; anything left out falls back to the built-in
//! defaults, which reproduce the published dashboard.

mod loader;

pub use loader::{
    default_config_toml, directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

use crate::core::MedianStrategy;
use crate::impact::ImpactThresholds;
use crate::pipeline::YearFilter;
use crate::state::{DashboardSettings, ViewState};
use crate::views::artists::{DEFAULT_ARTIST_LIMIT, DEFAULT_MIN_VIDEOS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagemapConfig {
    /// Directory holding `data_<platform>.json` and `artist_stats.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub thresholds: ImpactThresholds,
    pub statistics: StatisticsConfig,
    pub artists: ArtistsConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub median: MedianStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistsConfig {
    pub limit: usize,
    pub min_videos: u64,
    /// Four-digit year or `all`.
    pub year: String,
}

impl Default for ArtistsConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ARTIST_LIMIT,
            min_videos: DEFAULT_MIN_VIDEOS,
            year: "all".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: crate::state::dashboard::DEFAULT_PAGE_SIZE,
        }
    }
}

impl EngagemapConfig {
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            thresholds: self.thresholds,
            median: self.statistics.median,
            artist_limit: self.artists.limit,
            page_size: self.display.page_size,
        }
    }

    /// Starting view state with the configured artist defaults applied.
    pub fn initial_state(&self) -> ViewState {
        ViewState {
            min_videos: self.artists.min_videos,
            artist_year: self.artists.year.parse().unwrap_or(YearFilter::All),
            ..ViewState::default()
        }
    }
}
