//! Histogram and violin projection of one metric across posts.
//!
//! Interaction rate is clamped to a fixed ceiling so a few viral posts do not
//! flatten the shape; views and likes scale to the observed maximum.

use crate::core::{mean, median, MedianStrategy, Post};
use crate::impact::MetricFamily;
use rand::Rng;
use serde::Serialize;

/// Fixed ceiling for interaction-rate values.
pub const RATE_CEILING: f64 = 25.0;
const RATE_BINS: usize = 26;
const COUNT_BINS: usize = 50;
/// Share of a bin's width a scatter point may be jittered across.
const JITTER_SPREAD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Cosmetic horizontal offset; never read back by any computation.
    pub x: f64,
    pub y: f64,
    pub description: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub family: MetricFamily,
    pub metric_name: &'static str,
    pub unit: &'static str,
    pub max_value: f64,
    pub bins: Vec<usize>,
    /// Bin counts normalized to the tallest bin, 0..=100.
    pub widths: Vec<f64>,
    pub shape: Vec<ShapePoint>,
    pub points: Vec<ScatterPoint>,
    pub median: f64,
    pub mean: f64,
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn bin_count(family: MetricFamily) -> usize {
    match family {
        MetricFamily::InteractionRate => RATE_BINS,
        MetricFamily::Views | MetricFamily::Likes => COUNT_BINS,
    }
}

/// `clamp(floor(value / max_value * (bins - 1)), 0, bins - 1)`
pub fn bin_index(value: f64, max_value: f64, bins: usize) -> usize {
    let last = bins.saturating_sub(1);
    let scaled = (value / max_value * last as f64).floor();
    if scaled.is_finite() && scaled > 0.0 {
        (scaled as usize).min(last)
    } else {
        0
    }
}

pub fn histogram(values: &[f64], max_value: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 {
        return counts;
    }
    for value in values {
        counts[bin_index(*value, max_value, bins)] += 1;
    }
    counts
}

pub fn normalize_widths(counts: &[usize]) -> Vec<f64> {
    let tallest = counts.iter().copied().max().unwrap_or(0);
    if tallest == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|count| *count as f64 / tallest as f64 * 100.0)
        .collect()
}

/// Outline of the violin: a left and a right point per bin.
pub fn violin_shape(widths: &[f64], max_value: f64) -> Vec<ShapePoint> {
    let last = widths.len().saturating_sub(1).max(1) as f64;
    widths
        .iter()
        .enumerate()
        .flat_map(|(idx, width)| {
            let y = idx as f64 / last * max_value;
            [
                ShapePoint { x: -width / 2.0, y },
                ShapePoint { x: width / 2.0, y },
            ]
        })
        .collect()
}

fn project(post: &Post, family: MetricFamily) -> f64 {
    let value = family.value_of(post);
    match family {
        MetricFamily::InteractionRate => value.min(RATE_CEILING),
        MetricFamily::Views | MetricFamily::Likes => value,
    }
}

fn scale_ceiling(values: &[f64], family: MetricFamily) -> f64 {
    match family {
        MetricFamily::InteractionRate => RATE_CEILING,
        MetricFamily::Views | MetricFamily::Likes => values.iter().copied().fold(1.0, f64::max),
    }
}

/// Build the distribution with jitter drawn from the thread-local RNG.
pub fn build_distribution<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    family: MetricFamily,
    strategy: MedianStrategy,
) -> Distribution {
    let mut distribution = distribution_outline(posts, family, strategy);
    jitter_points(&mut distribution, &mut rand::rng());
    distribution
}

/// Everything but the jitter: scatter points sit on `x = 0`.
///
/// Depends only on its arguments, so it can be cached.
pub fn distribution_outline<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    family: MetricFamily,
    strategy: MedianStrategy,
) -> Distribution {
    let posts: Vec<&Post> = posts.into_iter().collect();
    let values: Vec<f64> = posts.iter().map(|p| project(p, family)).collect();

    let max_value = scale_ceiling(&values, family);
    let bins = histogram(&values, max_value, bin_count(family));
    let widths = normalize_widths(&bins);

    let points = posts
        .iter()
        .zip(&values)
        .map(|(post, value)| ScatterPoint {
            x: 0.0,
            y: *value,
            description: post.description.clone(),
            artist: post.artist.clone(),
        })
        .collect();

    Distribution {
        family,
        metric_name: family.name(),
        unit: family.unit(),
        max_value,
        shape: violin_shape(&widths, max_value),
        bins,
        widths,
        points,
        median: median(&values, strategy),
        mean: mean(&values),
    }
}

/// Redraw every scatter point's horizontal offset within its bin's width.
pub fn jitter_points<R: Rng + ?Sized>(distribution: &mut Distribution, rng: &mut R) {
    let num_bins = distribution.bins.len();
    for point in &mut distribution.points {
        let bin = bin_index(point.y, distribution.max_value, num_bins);
        let width = distribution.widths.get(bin).copied().unwrap_or(0.0);
        point.x = (rng.random::<f64>() - 0.5) * width * JITTER_SPREAD;
    }
}
