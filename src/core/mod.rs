//! Data model for the loaded documents.
//!
//! Everything here is read-only after load: a [`Dataset`] is replaced
//! wholesale when the platform changes and never mutated in place.

pub mod metrics;

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub use metrics::{aggregate_posts, mean, median, MedianStrategy, Metric, PostSummary};

/// Content network whose documents are active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Tiktok,
    Instagram,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Tiktok => "TikTok",
            Platform::Instagram => "Instagram",
        }
    }

    /// File name of the month-keyed document for this platform.
    pub fn document_name(&self) -> String {
        format!("data_{}.json", self.as_str())
    }

    pub fn all() -> &'static [Platform] {
        &[Platform::Tiktok, Platform::Instagram]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            _ => Err(Error::unknown("platform", s)),
        }
    }
}

/// One published piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub collects: u64,
    /// Interaction rate percentage, precomputed upstream.
    #[serde(default)]
    pub ir: f64,
}

impl Post {
    /// Four-digit year prefix of the publication date.
    pub fn year(&self) -> &str {
        self.date.get(..4).unwrap_or(&self.date)
    }

    pub fn validate(&self) -> Result<()> {
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(Error::validation(format!(
                "post date '{}' is not a YYYY-MM-DD date",
                self.date
            )));
        }
        if !self.ir.is_finite() || self.ir < 0.0 {
            return Err(Error::validation(format!(
                "post {} has interaction rate {} outside [0, inf)",
                self.date, self.ir
            )));
        }
        Ok(())
    }
}

/// Aggregate for one calendar month plus the posts it was computed from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthBucket {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub median_views: f64,
    #[serde(default)]
    pub avg_views: f64,
    #[serde(default)]
    pub avg_likes: f64,
    #[serde(default)]
    pub avg_ir: f64,
    #[serde(default)]
    pub total_shares: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub total_collects: u64,
    #[serde(default)]
    pub all_videos: Vec<Post>,
}

impl MonthBucket {
    /// Build a bucket whose aggregates are computed from `posts`.
    ///
    /// Loaded documents carry their own aggregates; this is for fixtures and
    /// for callers assembling buckets in memory.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let summary = aggregate_posts(&posts);
        let views: Vec<f64> = posts.iter().map(|p| p.views as f64).collect();
        Self {
            total_posts: summary.count as u64,
            median_views: median(&views, MedianStrategy::UpperMiddle),
            avg_views: summary.mean_views,
            avg_likes: summary.mean_likes,
            avg_ir: summary.mean_ir,
            total_shares: summary.sum_shares,
            total_comments: summary.sum_comments,
            total_collects: summary.sum_collects,
            all_videos: posts,
        }
    }
}

/// Month-keyed document for one platform.
///
/// The map is unordered; anything that needs chronological order goes
/// through [`Dataset::months`], which sorts keys ascending.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    months: HashMap<String, MonthBucket>,
}

impl Dataset {
    pub fn new(months: HashMap<String, MonthBucket>) -> Self {
        Self { months }
    }

    pub fn from_months<K: Into<String>>(months: impl IntoIterator<Item = (K, MonthBucket)>) -> Self {
        Self {
            months: months.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn get(&self, month: &str) -> Option<&MonthBucket> {
        self.months.get(month)
    }

    /// Buckets in ascending month order.
    pub fn months(&self) -> Vec<(&str, &MonthBucket)> {
        let mut entries: Vec<_> = self
            .months
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Every post, months ascending, document order within a month.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.months()
            .into_iter()
            .flat_map(|(_, bucket)| bucket.all_videos.iter())
    }

    pub fn total_posts(&self) -> usize {
        self.months.values().map(|b| b.all_videos.len()).sum()
    }

    pub fn validate(&self) -> Result<()> {
        for (key, bucket) in &self.months {
            validate_month_key(key)?;
            for post in &bucket.all_videos {
                post.validate()?;
            }
        }
        Ok(())
    }
}

/// Checks that a key has the `YYYY-MM` shape with a real month.
pub fn validate_month_key(key: &str) -> Result<()> {
    let well_formed = key.len() == 7
        && key.as_bytes()[4] == b'-'
        && NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "month key '{key}' is not in YYYY-MM form"
        )))
    }
}

/// Per-artist summary for one platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArtistAggregate {
    #[serde(default)]
    pub total_videos: u64,
    #[serde(default)]
    pub avg_views: f64,
    #[serde(default)]
    pub avg_likes: f64,
    #[serde(default)]
    pub avg_ir: f64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_likes: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArtistStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<ArtistAggregate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<ArtistAggregate>,
}

impl ArtistStats {
    pub fn for_platform(&self, platform: Platform) -> Option<&ArtistAggregate> {
        match platform {
            Platform::Tiktok => self.tiktok.as_ref(),
            Platform::Instagram => self.instagram.as_ref(),
        }
    }
}

/// Artist name to per-platform aggregates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistDirectory {
    artists: HashMap<String, ArtistStats>,
}

impl ArtistDirectory {
    pub fn new(artists: HashMap<String, ArtistStats>) -> Self {
        Self { artists }
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    pub fn get(&self, artist: &str) -> Option<&ArtistStats> {
        self.artists.get(artist)
    }

    /// Entries in ascending name order.
    pub fn entries(&self) -> Vec<(&str, &ArtistStats)> {
        let mut entries: Vec<_> = self
            .artists
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::post;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_platform_round_trip_names() {
        for platform in Platform::all() {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), *platform);
        }
        assert_eq!(Platform::Instagram.document_name(), "data_instagram.json");
        assert!("vine".parse::<Platform>().is_err());
    }

    #[test]
    fn test_months_sorted_regardless_of_insertion() {
        let dataset = Dataset::from_months([
            ("2025-02", MonthBucket::default()),
            ("2024-12", MonthBucket::default()),
            ("2025-01", MonthBucket::default()),
        ]);
        let keys: Vec<&str> = dataset.months().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_posts_iterate_in_month_order() {
        let dataset = Dataset::from_months([
            ("2025-02", MonthBucket::from_posts(vec![post("2025-02-03", 5, 1, 1.0)])),
            ("2025-01", MonthBucket::from_posts(vec![post("2025-01-09", 7, 1, 1.0)])),
        ]);
        let dates: Vec<&str> = dataset.posts().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-09", "2025-02-03"]);
        assert_eq!(dataset.total_posts(), 2);
    }

    #[test]
    fn test_month_key_validation() {
        assert!(validate_month_key("2025-01").is_ok());
        assert!(validate_month_key("2025-13").is_err());
        assert!(validate_month_key("2025-1").is_err());
        assert!(validate_month_key("202501x").is_err());
    }

    #[test]
    fn test_post_validation_rejects_negative_ir() {
        assert!(post("2025-01-01", 1, 1, 2.5).validate().is_ok());
        assert!(post("2025-01-01", 1, 1, -0.1).validate().is_err());
        assert!(post("2025-01-01", 1, 1, f64::NAN).validate().is_err());
        assert!(post("01/02/2025", 1, 1, 1.0).validate().is_err());
    }

    #[test]
    fn test_post_deserializes_with_missing_counters() {
        let post: Post = serde_json::from_str(r#"{"date": "2025-03-04", "views": 10}"#).unwrap();
        assert_eq!(post.views, 10);
        assert_eq!(post.likes, 0);
        assert_eq!(post.ir, 0.0);
        assert_eq!(post.year(), "2025");
    }

    #[test]
    fn test_from_posts_computes_aggregates() {
        let bucket = MonthBucket::from_posts(vec![
            post("2025-01-01", 10, 2, 1.0),
            post("2025-01-02", 30, 4, 3.0),
        ]);
        assert_eq!(bucket.total_posts, 2);
        assert_eq!(bucket.avg_views, 20.0);
        assert_eq!(bucket.median_views, 30.0);
        assert_eq!(bucket.total_collects, 6);
    }

    #[test]
    fn test_artist_stats_platform_lookup() {
        let stats = ArtistStats {
            tiktok: Some(ArtistAggregate {
                total_videos: 4,
                ..Default::default()
            }),
            instagram: None,
        };
        assert_eq!(stats.for_platform(Platform::Tiktok).map(|a| a.total_videos), Some(4));
        assert!(stats.for_platform(Platform::Instagram).is_none());
    }
}
