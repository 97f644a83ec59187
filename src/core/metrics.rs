//! Aggregation over post collections.
//!
//! Every function here is total: empty input yields zero rather than an
//! error or a division by zero.

use crate::core::Post;
use crate::impact::MetricFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the middle of an even-length series is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianStrategy {
    /// `sorted[n / 2]`: the upper of the two middle elements.
    #[default]
    UpperMiddle,
    /// Average of the two middle elements.
    Midpoint,
}

/// Headline metric selectable for the evolution chart and artist ranking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Metric {
    MedianViews,
    AvgViews,
    AvgLikes,
    MedianIr,
    #[default]
    AvgIr,
}

impl Metric {
    /// The impact family whose thresholds apply when this metric is selected.
    pub fn family(&self) -> MetricFamily {
        match self {
            Metric::MedianIr | Metric::AvgIr => MetricFamily::InteractionRate,
            Metric::MedianViews | Metric::AvgViews => MetricFamily::Views,
            Metric::AvgLikes => MetricFamily::Likes,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::MedianViews => "Median Views",
            Metric::AvgViews => "Average Views",
            Metric::AvgLikes => "Average Likes",
            Metric::MedianIr => "Median Interaction Rate",
            Metric::AvgIr => "Average Interaction Rate",
        }
    }

    pub fn is_rate(&self) -> bool {
        matches!(self.family(), MetricFamily::InteractionRate)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count, means and sums over a post collection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PostSummary {
    pub count: usize,
    pub mean_views: f64,
    pub mean_likes: f64,
    pub mean_ir: f64,
    pub sum_shares: u64,
    pub sum_comments: u64,
    pub sum_collects: u64,
}

pub fn aggregate_posts<'a>(posts: impl IntoIterator<Item = &'a Post>) -> PostSummary {
    let mut summary = PostSummary::default();
    let (mut views, mut likes, mut ir) = (0.0, 0.0, 0.0);

    for post in posts {
        summary.count += 1;
        views += post.views as f64;
        likes += post.likes as f64;
        ir += post.ir;
        summary.sum_shares += post.shares;
        summary.sum_comments += post.comments;
        summary.sum_collects += post.collects;
    }

    if summary.count > 0 {
        let n = summary.count as f64;
        summary.mean_views = views / n;
        summary.mean_likes = likes / n;
        summary.mean_ir = ir / n;
    }
    summary
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64], strategy: MedianStrategy) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;

    match strategy {
        MedianStrategy::UpperMiddle => sorted[mid],
        MedianStrategy::Midpoint if sorted.len() % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        MedianStrategy::Midpoint => sorted[mid],
    }
}
