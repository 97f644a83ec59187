//! Impact classification for posts.
//!
//! Every post falls in exactly one of five ordered categories per metric
//! family. The boundaries live in a single [`ImpactThresholds`] table so the
//! filter, the monthly stacks and the breakdown all read the same cuts.

pub mod thresholds;

use crate::core::Post;
use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use thresholds::{FamilyThresholds, ImpactBand, ImpactThresholds};

/// Engagement tier assigned to a post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ImpactCategory {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ImpactCategory {
    /// Categories from lowest to highest; classification scans in this order.
    pub fn all() -> &'static [ImpactCategory] {
        &[
            ImpactCategory::VeryLow,
            ImpactCategory::Low,
            ImpactCategory::Medium,
            ImpactCategory::High,
            ImpactCategory::VeryHigh,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            ImpactCategory::VeryLow => 0,
            ImpactCategory::Low => 1,
            ImpactCategory::Medium => 2,
            ImpactCategory::High => 3,
            ImpactCategory::VeryHigh => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImpactCategory::VeryLow => "Very Low",
            ImpactCategory::Low => "Low",
            ImpactCategory::Medium => "Medium",
            ImpactCategory::High => "High",
            ImpactCategory::VeryHigh => "Very High",
        }
    }

    /// Label used by the published dashboard.
    pub fn dashboard_label(&self) -> &'static str {
        match self {
            ImpactCategory::VeryLow => "Muy Bajo",
            ImpactCategory::Low => "Bajo",
            ImpactCategory::Medium => "Medio",
            ImpactCategory::High => "Alto",
            ImpactCategory::VeryHigh => "Muy Alto",
        }
    }

    /// Display color as a `#rrggbb` hex string.
    pub fn color(&self) -> &'static str {
        match self {
            ImpactCategory::VeryLow => "#ef4444",
            ImpactCategory::Low => "#f97316",
            ImpactCategory::Medium => "#eab308",
            ImpactCategory::High => "#84cc16",
            ImpactCategory::VeryHigh => "#22c55e",
        }
    }

    /// Color as an RGB triple for terminal output.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.color()[1..];
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or(0)
        };
        (channel(0..2), channel(2..4), channel(4..6))
    }
}

impl fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImpactCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "verylow" | "muybajo" => Ok(ImpactCategory::VeryLow),
            "low" | "bajo" => Ok(ImpactCategory::Low),
            "medium" | "medio" => Ok(ImpactCategory::Medium),
            "high" | "alto" => Ok(ImpactCategory::High),
            "veryhigh" | "muyalto" => Ok(ImpactCategory::VeryHigh),
            _ => Err(Error::unknown("impact category", s)),
        }
    }
}

/// Which post field a classification reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    InteractionRate,
    Views,
    Likes,
}

impl MetricFamily {
    pub fn value_of(&self, post: &Post) -> f64 {
        match self {
            MetricFamily::InteractionRate => post.ir,
            MetricFamily::Views => post.views as f64,
            MetricFamily::Likes => post.likes as f64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricFamily::InteractionRate => "IR",
            MetricFamily::Views => "Views",
            MetricFamily::Likes => "Likes",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricFamily::InteractionRate => "%",
            MetricFamily::Views | MetricFamily::Likes => "",
        }
    }

    pub fn all() -> &'static [MetricFamily] {
        &[
            MetricFamily::InteractionRate,
            MetricFamily::Views,
            MetricFamily::Likes,
        ]
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parses_english_and_dashboard_labels() {
        assert_eq!("Muy Alto".parse::<ImpactCategory>().unwrap(), ImpactCategory::VeryHigh);
        assert_eq!("very-high".parse::<ImpactCategory>().unwrap(), ImpactCategory::VeryHigh);
        assert_eq!("Very Low".parse::<ImpactCategory>().unwrap(), ImpactCategory::VeryLow);
        assert_eq!("medio".parse::<ImpactCategory>().unwrap(), ImpactCategory::Medium);
        assert!("extreme".parse::<ImpactCategory>().is_err());
    }

    #[test]
    fn test_category_order_matches_index() {
        for (i, category) in ImpactCategory::all().iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert!(ImpactCategory::VeryLow < ImpactCategory::VeryHigh);
    }

    #[test]
    fn test_category_rgb() {
        assert_eq!(ImpactCategory::VeryLow.rgb(), (0xef, 0x44, 0x44));
        assert_eq!(ImpactCategory::VeryHigh.rgb(), (0x22, 0xc5, 0x5e));
    }
}
