//! Engagement analytics over precomputed TikTok and Instagram post
//! statistics.
//!
//! Documents are loaded through a [`io::DocumentSource`] into a
//! [`state::Dashboard`], which derives every view (metric cards, monthly
//! evolution, impact breakdowns, distributions, post tables and artist
//! rankings) from an immutable [`state::ViewState`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod distribution;
pub mod errors;
pub mod formatting;
pub mod impact;
pub mod io;
pub mod pipeline;
pub mod state;
pub mod views;

pub use crate::core::{
    ArtistAggregate, ArtistDirectory, ArtistStats, Dataset, MedianStrategy, Metric, MonthBucket,
    Platform, Post,
};
pub use crate::errors::{Error, Result};
pub use crate::impact::{ImpactCategory, ImpactThresholds, MetricFamily};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter, Report};
pub use crate::io::source::{DocumentSource, FileSource, MemorySource};
pub use crate::pipeline::{select_posts, ImpactFilter, PostQuery, SortField, SortSpec, YearFilter};
pub use crate::state::{reduce, Action, Dashboard, DashboardSettings, ViewState};
