use crate::core::{aggregate_posts, Dataset, Post};
use serde::Serialize;
use std::collections::BTreeSet;

/// Headline metric cards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricCards {
    pub total_posts: usize,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_ir: f64,
    pub total_shares: u64,
    pub total_comments: u64,
    pub total_collects: u64,
}

/// Cards over one month's posts, or over every post when no month (or an
/// unknown month) is selected.
pub fn summarize(dataset: &Dataset, month: Option<&str>) -> MetricCards {
    match month.and_then(|m| dataset.get(m)) {
        Some(bucket) => cards_for(&bucket.all_videos),
        None => cards_for(dataset.posts()),
    }
}

pub fn cards_for<'a>(posts: impl IntoIterator<Item = &'a Post>) -> MetricCards {
    let summary = aggregate_posts(posts);
    MetricCards {
        total_posts: summary.count,
        avg_views: summary.mean_views,
        avg_likes: summary.mean_likes,
        avg_ir: summary.mean_ir,
        total_shares: summary.sum_shares,
        total_comments: summary.sum_comments,
        total_collects: summary.sum_collects,
    }
}

/// Distinct four-digit years present in the month keys, ascending.
pub fn available_years(dataset: &Dataset) -> Vec<String> {
    dataset
        .months()
        .into_iter()
        .filter_map(|(key, _)| key.get(..4))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::post;
    use crate::core::MonthBucket;
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        Dataset::from_months([
            (
                "2024-11",
                MonthBucket::from_posts(vec![post("2024-11-02", 100, 10, 2.0)]),
            ),
            (
                "2025-01",
                MonthBucket::from_posts(vec![
                    post("2025-01-01", 200, 20, 4.0),
                    post("2025-01-02", 600, 60, 8.0),
                ]),
            ),
        ])
    }

    #[test]
    fn test_summary_over_all_posts() {
        let cards = summarize(&dataset(), None);
        assert_eq!(cards.total_posts, 3);
        assert_eq!(cards.avg_views, 300.0);
        assert_eq!(cards.total_shares, 3);
        assert_eq!(cards.total_collects, 9);
    }

    #[test]
    fn test_summary_for_selected_month() {
        let cards = summarize(&dataset(), Some("2025-01"));
        assert_eq!(cards.total_posts, 2);
        assert_eq!(cards.avg_likes, 40.0);
        assert_eq!(cards.avg_ir, 6.0);
    }

    #[test]
    fn test_unknown_month_falls_back_to_everything() {
        assert_eq!(summarize(&dataset(), Some("2030-01")).total_posts, 3);
    }

    #[test]
    fn test_empty_dataset_yields_zero_cards() {
        assert_eq!(summarize(&Dataset::default(), None), MetricCards::default());
    }

    #[test]
    fn test_available_years_are_distinct_and_sorted() {
        let data = Dataset::from_months([
            ("2025-03", MonthBucket::default()),
            ("2024-01", MonthBucket::default()),
            ("2025-01", MonthBucket::default()),
        ]);
        assert_eq!(available_years(&data), vec!["2024", "2025"]);
    }
}
