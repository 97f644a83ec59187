//! Sorting for post tables.
//!
//! Sorting is stable: posts with equal keys keep the order they arrived in,
//! which for the pipeline is ascending month then document order.

use crate::core::Post;
use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column a post table can be ordered by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Views,
    Likes,
    Shares,
    Comments,
    Collects,
    Ir,
}

impl SortField {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Views => "Views",
            SortField::Likes => "Likes",
            SortField::Shares => "Shares",
            SortField::Comments => "Comments",
            SortField::Collects => "Collects",
            SortField::Ir => "IR",
        }
    }

    pub fn all() -> &'static [SortField] {
        &[
            SortField::Date,
            SortField::Views,
            SortField::Likes,
            SortField::Shares,
            SortField::Comments,
            SortField::Collects,
            SortField::Ir,
        ]
    }

    /// Ascending comparison of two posts on this field.
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        match self {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Likes => a.likes.cmp(&b.likes),
            SortField::Shares => a.shares.cmp(&b.shares),
            SortField::Comments => a.comments.cmp(&b.comments),
            SortField::Collects => a.collects.cmp(&b.collects),
            SortField::Ir => a.ir.total_cmp(&b.ir),
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::all()
            .iter()
            .find(|field| field.display_name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::unknown("sort field", s))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Header-click behavior: the same column flips direction, a new column
    /// starts descending.
    pub fn clicked(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.toggled())
        } else {
            Self::descending(field)
        }
    }

    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{} ({})", self.field.display_name(), arrow)
    }
}

/// Sorts posts by the given spec.
///
/// Pure function - returns the sorted Vec.
pub fn sort_posts(mut posts: Vec<Post>, spec: SortSpec) -> Vec<Post> {
    posts.sort_by(|a, b| spec.compare(a, b));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::post;

    fn dates(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.date.as_str()).collect()
    }

    #[test]
    fn test_sort_by_views_descending() {
        let posts = vec![
            post("2025-01-01", 10, 0, 0.0),
            post("2025-01-02", 30, 0, 0.0),
            post("2025-01-03", 20, 0, 0.0),
        ];
        let sorted = sort_posts(posts, SortSpec::descending(SortField::Views));
        assert_eq!(dates(&sorted), vec!["2025-01-02", "2025-01-03", "2025-01-01"]);
    }

    #[test]
    fn test_sort_by_date_ascending() {
        let posts = vec![post("2025-03-01", 0, 0, 0.0), post("2024-12-31", 0, 0, 0.0)];
        let sorted = sort_posts(posts, SortSpec::new(SortField::Date, SortDirection::Asc));
        assert_eq!(dates(&sorted), vec!["2024-12-31", "2025-03-01"]);
    }

    #[test]
    fn test_equal_keys_keep_arrival_order_in_both_directions() {
        let posts = vec![
            post("2025-01-01", 5, 0, 0.0),
            post("2025-01-02", 5, 0, 0.0),
            post("2025-01-03", 5, 0, 0.0),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sorted = sort_posts(posts.clone(), SortSpec::new(SortField::Views, direction));
            assert_eq!(dates(&sorted), vec!["2025-01-01", "2025-01-02", "2025-01-03"]);
        }
    }

    #[test]
    fn test_sort_by_ir_handles_fractions() {
        let posts = vec![post("a", 0, 0, 1.5), post("b", 0, 0, 10.25), post("c", 0, 0, 3.0)];
        let sorted = sort_posts(posts, SortSpec::new(SortField::Ir, SortDirection::Asc));
        assert_eq!(dates(&sorted), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_clicked_toggles_or_resets() {
        let spec = SortSpec::descending(SortField::Date);
        assert_eq!(spec.clicked(SortField::Date).direction, SortDirection::Asc);
        let views = spec.clicked(SortField::Date).clicked(SortField::Views);
        assert_eq!(views, SortSpec::descending(SortField::Views));
    }

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!("ir".parse::<SortField>().unwrap(), SortField::Ir);
        assert_eq!("Views".parse::<SortField>().unwrap(), SortField::Views);
        assert!("plays".parse::<SortField>().is_err());
    }
}
