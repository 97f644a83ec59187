use crate::core::Post;
use crate::errors::Error;
use crate::impact::{ImpactCategory, ImpactThresholds, MetricFamily};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Year restriction on month keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearFilter {
    #[default]
    All,
    Year(String),
}

impl YearFilter {
    /// Exact four-digit prefix match on a `YYYY-MM` key.
    pub fn matches_month(&self, month_key: &str) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => month_key.starts_with(year.as_str()),
        }
    }

    /// Same prefix rule applied to a `YYYY-MM-DD` date.
    pub fn matches_date(&self, date: &str) -> bool {
        self.matches_month(date)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, YearFilter::All)
    }
}

impl FromStr for YearFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(YearFilter::All)
        } else if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(YearFilter::Year(s.to_string()))
        } else {
            Err(Error::unknown("year", s))
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str("all"),
            YearFilter::Year(year) => f.write_str(year),
        }
    }
}

/// Impact-category restriction on posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactFilter {
    #[default]
    All,
    Only(ImpactCategory),
}

impl FromStr for ImpactFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(ImpactFilter::All)
        } else {
            s.parse().map(ImpactFilter::Only)
        }
    }
}

impl fmt::Display for ImpactFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactFilter::All => f.write_str("all"),
            ImpactFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Month-level restriction: year prefix and optional exact month key.
pub fn month_selected(month_key: &str, year: &YearFilter, month: Option<&str>) -> bool {
    year.matches_month(month_key) && month.map_or(true, |m| m == month_key)
}

pub fn matches_text(post: &Post, needle_lower: &str) -> bool {
    post.description.to_lowercase().contains(needle_lower)
        || post.artist.to_lowercase().contains(needle_lower)
}

type PostPredicate<'a> = Box<dyn Fn(&Post) -> bool + 'a>;

/// Post-level predicates for the active filters; an empty list keeps all.
pub fn build_post_predicates<'a>(
    impact: ImpactFilter,
    family: MetricFamily,
    text: Option<&str>,
    thresholds: &'a ImpactThresholds,
) -> Vec<PostPredicate<'a>> {
    let mut predicates: Vec<PostPredicate<'a>> = Vec::new();

    if let ImpactFilter::Only(category) = impact {
        predicates.push(Box::new(move |post| {
            thresholds.classify_post(post, family) == category
        }));
    }

    if let Some(needle) = text.map(str::trim).filter(|t| !t.is_empty()) {
        let needle = needle.to_lowercase();
        predicates.push(Box::new(move |post| matches_text(post, &needle)));
    }

    predicates
}
