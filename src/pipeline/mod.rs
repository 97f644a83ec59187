//! Pure filter/sort pipeline producing post tables.
//!
//! ```text
//! Dataset
//!    │
//!    ├─→ month_selected()         ← year prefix, exact month (ascending keys)
//!    ├─→ build_post_predicates()  ← impact category, free text
//!    ├─→ sort_posts()             ← stable, field + direction
//!    └─→ paginate()               ← optional, for tables
//! ```
//!
//! The pipeline reads nothing but its arguments: the same dataset, query and
//! thresholds always produce the same sequence.

pub mod filters;
pub mod sort;

use crate::core::{Dataset, Post};
use crate::impact::{ImpactThresholds, MetricFamily};
use serde::{Deserialize, Serialize};

pub use filters::{ImpactFilter, YearFilter};
pub use sort::{sort_posts, SortDirection, SortField, SortSpec};

/// Everything that selects and orders a post table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostQuery {
    pub year: YearFilter,
    pub month: Option<String>,
    pub impact: ImpactFilter,
    /// Family the impact filter classifies against.
    pub family: MetricFamily,
    pub text: Option<String>,
    pub sort: SortSpec,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            year: YearFilter::All,
            month: None,
            impact: ImpactFilter::All,
            family: MetricFamily::InteractionRate,
            text: None,
            sort: SortSpec::descending(SortField::Date),
        }
    }
}

impl PostQuery {
    /// Month key to restrict to, treating `all` as no restriction.
    fn month_key(&self) -> Option<&str> {
        self.month
            .as_deref()
            .filter(|m| !m.eq_ignore_ascii_case("all"))
    }
}

pub fn select_posts(dataset: &Dataset, query: &PostQuery, thresholds: &ImpactThresholds) -> Vec<Post> {
    let month = query.month_key();
    let predicates = filters::build_post_predicates(
        query.impact,
        query.family,
        query.text.as_deref(),
        thresholds,
    );

    let selected: Vec<Post> = dataset
        .months()
        .into_iter()
        .filter(|(key, _)| filters::month_selected(key, &query.year, month))
        .flat_map(|(_, bucket)| bucket.all_videos.iter())
        .filter(|post| predicates.iter().all(|keep| keep(post)))
        .cloned()
        .collect();

    sort_posts(selected, query.sort)
}

/// One page of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page actually returned (clamped to the last page).
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let page_count = total.div_ceil(page_size);
    let page = page.min(page_count.saturating_sub(1));
    let start = page * page_size;
    let end = (start + page_size).min(total);

    Page {
        items: items.get(start..end).unwrap_or_default().to_vec(),
        page,
        page_count,
        total,
    }
}
