//! Month-by-month series for the evolution and impact charts.

use crate::core::{median, Dataset, MedianStrategy, Metric, MonthBucket};
use crate::impact::{ImpactCategory, ImpactThresholds, MetricFamily};
use crate::pipeline::YearFilter;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionPoint {
    pub month: String,
    pub posts: u64,
    pub metric: f64,
}

/// Value of `metric` for one bucket.
///
/// Stored aggregates are trusted as-is; only the median interaction rate is
/// computed here because the documents do not carry it.
pub fn bucket_metric(bucket: &MonthBucket, metric: Metric, strategy: MedianStrategy) -> f64 {
    match metric {
        Metric::MedianViews => bucket.median_views,
        Metric::AvgViews => bucket.avg_views,
        Metric::AvgLikes => bucket.avg_likes,
        Metric::AvgIr => bucket.avg_ir,
        Metric::MedianIr => {
            let rates: Vec<f64> = bucket.all_videos.iter().map(|p| p.ir).collect();
            median(&rates, strategy)
        }
    }
}

pub fn evolution_series(
    dataset: &Dataset,
    metric: Metric,
    year: &YearFilter,
    strategy: MedianStrategy,
) -> Vec<EvolutionPoint> {
    dataset
        .months()
        .into_iter()
        .filter(|(key, _)| year.matches_month(key))
        .map(|(key, bucket)| EvolutionPoint {
            month: key.to_string(),
            posts: bucket.total_posts,
            metric: bucket_metric(bucket, metric, strategy),
        })
        .collect()
}

/// Per-category post counts for one month, indexed by [`ImpactCategory::index`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthImpact {
    pub month: String,
    pub counts: [usize; 5],
}

impl MonthImpact {
    pub fn count(&self, category: ImpactCategory) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

pub fn impact_by_month(
    dataset: &Dataset,
    family: MetricFamily,
    year: &YearFilter,
    thresholds: &ImpactThresholds,
) -> Vec<MonthImpact> {
    dataset
        .months()
        .into_iter()
        .filter(|(key, _)| year.matches_month(key))
        .map(|(key, bucket)| {
            let mut counts = [0; 5];
            for post in &bucket.all_videos {
                counts[thresholds.classify_post(post, family).index()] += 1;
            }
            MonthImpact {
                month: key.to_string(),
                counts,
            }
        })
        .collect()
}
