//! Artist ranking and per-artist post tables.
//!
//! Artist aggregates come from the directory document; posts are linked to
//! an artist only by exact name match on the post's `artist` field.

use crate::core::{
    median, ArtistAggregate, ArtistDirectory, Dataset, MedianStrategy, Metric, Platform, Post,
};
use crate::pipeline::{sort_posts, SortSpec, YearFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_ARTIST_LIMIT: usize = 30;
pub const DEFAULT_MIN_VIDEOS: u64 = 3;

/// Inputs of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistQuery {
    pub metric: Metric,
    pub year: YearFilter,
    pub min_videos: u64,
    /// Artists whose name contains this word (case-insensitive) are left out.
    pub exclusion: Option<String>,
    pub limit: usize,
}

impl Default for ArtistQuery {
    fn default() -> Self {
        Self {
            metric: Metric::AvgIr,
            year: YearFilter::All,
            min_videos: DEFAULT_MIN_VIDEOS,
            exclusion: None,
            limit: DEFAULT_ARTIST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRow {
    pub artist: String,
    pub videos: u64,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_ir: f64,
    pub total_views: u64,
    pub total_likes: u64,
    pub metric: f64,
}

fn excluded(name: &str, exclusion: Option<&str>) -> bool {
    exclusion
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .is_some_and(|word| name.to_lowercase().contains(&word.to_lowercase()))
}

/// Posts grouped by artist name, restricted to the year filter.
fn posts_by_artist<'a>(dataset: &'a Dataset, year: &YearFilter) -> HashMap<&'a str, Vec<&'a Post>> {
    let mut grouped: HashMap<&str, Vec<&Post>> = HashMap::new();
    for post in dataset.posts().filter(|p| year.matches_date(&p.date)) {
        grouped.entry(post.artist.as_str()).or_default().push(post);
    }
    grouped
}

fn artist_metric(
    aggregate: &ArtistAggregate,
    posts: &[&Post],
    metric: Metric,
    strategy: MedianStrategy,
) -> f64 {
    match metric {
        Metric::AvgViews => aggregate.avg_views,
        Metric::AvgLikes => aggregate.avg_likes,
        Metric::AvgIr => aggregate.avg_ir,
        Metric::MedianViews if posts.is_empty() => aggregate.avg_views,
        Metric::MedianIr if posts.is_empty() => aggregate.avg_ir,
        Metric::MedianViews => {
            let views: Vec<f64> = posts.iter().map(|p| p.views as f64).collect();
            median(&views, strategy)
        }
        Metric::MedianIr => {
            let rates: Vec<f64> = posts.iter().map(|p| p.ir).collect();
            median(&rates, strategy)
        }
    }
}

/// Top artists on `platform` by the query's metric, highest first.
///
/// Ties keep ascending name order.
pub fn rank_artists(
    directory: &ArtistDirectory,
    dataset: &Dataset,
    platform: Platform,
    query: &ArtistQuery,
    strategy: MedianStrategy,
) -> Vec<ArtistRow> {
    let grouped = posts_by_artist(dataset, &query.year);
    let no_posts: Vec<&Post> = Vec::new();

    let mut rows: Vec<ArtistRow> = directory
        .entries()
        .into_iter()
        .filter_map(|(name, stats)| stats.for_platform(platform).map(|agg| (name, agg)))
        .filter(|(name, _)| !excluded(name, query.exclusion.as_deref()))
        .filter(|(_, agg)| agg.total_videos >= query.min_videos)
        .filter_map(|(name, agg)| {
            let posts = grouped.get(name).unwrap_or(&no_posts);
            if !query.year.is_all() && (posts.len() as u64) < query.min_videos {
                return None;
            }
            Some(ArtistRow {
                artist: name.to_string(),
                videos: agg.total_videos,
                avg_views: agg.avg_views,
                avg_likes: agg.avg_likes,
                avg_ir: agg.avg_ir,
                total_views: agg.total_views,
                total_likes: agg.total_likes,
                metric: artist_metric(agg, posts, query.metric, strategy),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.metric.total_cmp(&a.metric));
    rows.truncate(query.limit);
    debug!(
        platform = %platform,
        metric = %query.metric,
        rows = rows.len(),
        "ranked artists"
    );
    rows
}

/// Every post credited to `artist`, ordered by `sort`.
pub fn artist_posts(dataset: &Dataset, artist: &str, sort: SortSpec) -> Vec<Post> {
    let posts = dataset
        .posts()
        .filter(|p| p.artist == artist)
        .cloned()
        .collect();
    sort_posts(posts, sort)
}
