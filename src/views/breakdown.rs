use crate::core::Post;
use crate::formatting::format_band_range;
use crate::impact::{ImpactCategory, ImpactThresholds, MetricFamily};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: ImpactCategory,
    pub label: &'static str,
    /// Band bounds in display form, e.g. `3.16-5.36%`.
    pub range: String,
    pub color: &'static str,
    pub count: usize,
    pub percentage: f64,
}

/// Category counts and shares over a set of posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactBreakdown {
    pub family: MetricFamily,
    pub total: usize,
    /// Lowest to highest.
    pub categories: Vec<CategoryShare>,
    /// VeryLow plus Low.
    pub low_impact_count: usize,
    pub low_impact_percentage: f64,
    pub very_high_count: usize,
    pub very_high_percentage: f64,
}

impl ImpactBreakdown {
    pub fn share(&self, category: ImpactCategory) -> &CategoryShare {
        &self.categories[category.index()]
    }
}

/// A table row: the post with its impact category for the active family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRow {
    #[serde(flatten)]
    pub post: Post,
    pub impact: ImpactCategory,
}

pub fn annotate_posts(
    posts: impl IntoIterator<Item = Post>,
    family: MetricFamily,
    thresholds: &ImpactThresholds,
) -> Vec<PostRow> {
    posts
        .into_iter()
        .map(|post| PostRow {
            impact: thresholds.classify_post(&post, family),
            post,
        })
        .collect()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn impact_breakdown<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    family: MetricFamily,
    thresholds: &ImpactThresholds,
) -> ImpactBreakdown {
    let mut counts = [0usize; 5];
    for post in posts {
        counts[thresholds.classify_post(post, family).index()] += 1;
    }
    let total: usize = counts.iter().sum();

    let categories: Vec<CategoryShare> = thresholds
        .bands(family)
        .iter()
        .map(|band| {
            let count = counts[band.category.index()];
            CategoryShare {
                category: band.category,
                label: band.category.dashboard_label(),
                range: format_band_range(band.min, band.max, family),
                color: band.category.color(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    let low_impact_count = counts[ImpactCategory::VeryLow.index()] + counts[ImpactCategory::Low.index()];
    let very_high_count = counts[ImpactCategory::VeryHigh.index()];

    ImpactBreakdown {
        family,
        total,
        categories,
        low_impact_count,
        low_impact_percentage: percentage(low_impact_count, total),
        very_high_count,
        very_high_percentage: percentage(very_high_count, total),
    }
}
