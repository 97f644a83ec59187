// Shared fixtures for engagemap integration tests
#![allow(dead_code)]

use engagemap::{Dataset, MonthBucket, Platform, Post};
use indoc::indoc;
use std::fs;
use std::path::Path;

pub fn post(date: &str, artist: &str, views: u64, likes: u64, ir: f64) -> Post {
    Post {
        date: date.to_string(),
        description: format!("{artist} en vivo"),
        artist: artist.to_string(),
        url: format!("https://example.com/{date}"),
        views,
        likes,
        shares: 1,
        comments: 2,
        collects: 3,
        ir,
    }
}

/// Two years of TikTok-like data with every impact band represented.
pub fn tiktok_dataset() -> Dataset {
    Dataset::from_months([
        (
            "2024-11",
            MonthBucket::from_posts(vec![
                post("2024-11-03", "Ana Tijoux", 2_400_000, 90_000, 31.0),
                post("2024-11-20", "Mon Laferte", 1_200, 40, 2.5),
            ]),
        ),
        (
            "2025-01",
            MonthBucket::from_posts(vec![
                post("2025-01-02", "Ana Tijoux", 1_800_000, 70_000, 24.0),
                post("2025-01-08", "Mon Laferte", 900, 30, 3.16),
                post("2025-01-15", "Denise Rosenthal", 3_100_000, 120_000, 40.5),
                post("2025-01-21", "Sin artista", 20_000, 1_500, 8.0),
            ]),
        ),
        (
            "2025-02",
            MonthBucket::from_posts(vec![
                post("2025-02-01", "Ana Tijoux", 2_000_000, 80_000, 23.22),
                post("2025-02-14", "Mon Laferte", 45_000, 3_000, 12.0),
            ]),
        ),
    ])
}

pub fn instagram_dataset() -> Dataset {
    Dataset::from_months([(
        "2023-06",
        MonthBucket::from_posts(vec![post("2023-06-10", "Javiera Mena", 5_000, 400, 6.0)]),
    )])
}

pub const ARTIST_STATS: &str = indoc! {r#"
    {
      "Ana Tijoux": {
        "tiktok": {"total_videos": 3, "avg_views": 2066666.7, "avg_likes": 80000,
                   "avg_ir": 26.07, "total_views": 6200000, "total_likes": 240000}
      },
      "Mon Laferte": {
        "tiktok": {"total_videos": 3, "avg_views": 15700, "avg_likes": 1023.3,
                   "avg_ir": 5.89, "total_views": 47100, "total_likes": 3070},
        "instagram": {"total_videos": 1, "avg_views": 5000, "avg_likes": 400,
                      "avg_ir": 6.0, "total_views": 5000, "total_likes": 400}
      },
      "Denise Rosenthal": {
        "tiktok": {"total_videos": 1, "avg_views": 3100000, "avg_likes": 120000,
                   "avg_ir": 40.5, "total_views": 3100000, "total_likes": 120000}
      }
    }
"#};

/// Write `data_tiktok.json`, `data_instagram.json` and `artist_stats.json`.
pub fn write_documents(dir: &Path) {
    for (platform, dataset) in [
        (Platform::Tiktok, tiktok_dataset()),
        (Platform::Instagram, instagram_dataset()),
    ] {
        let json = serde_json::to_string_pretty(&dataset).unwrap();
        fs::write(dir.join(platform.document_name()), json).unwrap();
    }
    fs::write(dir.join("artist_stats.json"), ARTIST_STATS).unwrap();
}
