//! Monthly CSV export.

use crate::core::{Dataset, MonthBucket, Platform};
use crate::errors::{Error, Result};
use std::fs;
use std::path::Path;

pub const CSV_HEADER: [&str; 9] = [
    "Month",
    "Total Posts",
    "Median Views",
    "Average Views",
    "Average Likes",
    "Total Shares",
    "Total Comments",
    "Total Collects",
    "Average Interaction Rate",
];

/// `evolucion_mensual_TikTok.csv` or `evolucion_mensual_Instagram.csv`.
pub fn export_file_name(platform: Platform) -> String {
    format!("evolucion_mensual_{}.csv", platform.display_name())
}

fn csv_row(month: &str, bucket: &MonthBucket) -> String {
    [
        month.to_string(),
        bucket.total_posts.to_string(),
        bucket.median_views.to_string(),
        bucket.avg_views.to_string(),
        bucket.avg_likes.to_string(),
        bucket.total_shares.to_string(),
        bucket.total_comments.to_string(),
        bucket.total_collects.to_string(),
        bucket.avg_ir.to_string(),
    ]
    .join(",")
}

/// Header plus one row per month, ascending, newline-joined without a
/// trailing newline.
pub fn monthly_csv(dataset: &Dataset) -> String {
    std::iter::once(CSV_HEADER.join(","))
        .chain(
            dataset
                .months()
                .into_iter()
                .map(|(month, bucket)| csv_row(month, bucket)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn write_csv(path: &Path, csv: &str) -> Result<()> {
    fs::write(path, csv).map_err(|e| Error::io("failed to write CSV export", path, e))
}
