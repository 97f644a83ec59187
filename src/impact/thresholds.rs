//! The threshold table behind impact classification.
//!
//! Each family is described by four ascending cut points. The five bands are
//! derived from them as `[0, c1) [c1, c2) [c2, c3) [c3, c4) [c4, inf)`, so the
//! bands partition `[0, inf)` by construction.

use super::{ImpactCategory, MetricFamily};
use crate::core::Post;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

pub const INTERACTION_RATE_CUTS: [f64; 4] = [3.16, 5.36, 11.09, 23.22];
pub const VIEWS_CUTS: [f64; 4] = [1746.0, 5197.0, 26760.0, 1_600_000.0];
pub const LIKES_CUTS: [f64; 4] = [58.0, 228.0, 2788.0, 50_000.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyThresholds {
    pub cuts: [f64; 4],
}

impl FamilyThresholds {
    pub const fn new(cuts: [f64; 4]) -> Self {
        Self { cuts }
    }

    pub fn bands(&self) -> [ImpactBand; 5] {
        let [c1, c2, c3, c4] = self.cuts;
        [
            ImpactBand::new(ImpactCategory::VeryLow, 0.0, c1),
            ImpactBand::new(ImpactCategory::Low, c1, c2),
            ImpactBand::new(ImpactCategory::Medium, c2, c3),
            ImpactBand::new(ImpactCategory::High, c3, c4),
            ImpactBand::new(ImpactCategory::VeryHigh, c4, f64::INFINITY),
        ]
    }

    fn validate(&self, family: MetricFamily) -> Result<()> {
        let finite_positive = self.cuts.iter().all(|c| c.is_finite() && *c > 0.0);
        let increasing = self.cuts.windows(2).all(|w| w[0] < w[1]);
        if finite_positive && increasing {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "{family} cuts {:?} must be finite, positive and strictly increasing",
                self.cuts
            )))
        }
    }
}

/// One row of the table: a category and its half-open `[min, max)` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactBand {
    pub category: ImpactCategory,
    pub min: f64,
    pub max: f64,
}

impl ImpactBand {
    fn new(category: ImpactCategory, min: f64, max: f64) -> Self {
        Self { category, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Cut points for every family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactThresholds {
    pub interaction_rate: FamilyThresholds,
    pub views: FamilyThresholds,
    pub likes: FamilyThresholds,
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            interaction_rate: FamilyThresholds::new(INTERACTION_RATE_CUTS),
            views: FamilyThresholds::new(VIEWS_CUTS),
            likes: FamilyThresholds::new(LIKES_CUTS),
        }
    }
}

impl ImpactThresholds {
    pub fn for_family(&self, family: MetricFamily) -> &FamilyThresholds {
        match family {
            MetricFamily::InteractionRate => &self.interaction_rate,
            MetricFamily::Views => &self.views,
            MetricFamily::Likes => &self.likes,
        }
    }

    pub fn bands(&self, family: MetricFamily) -> [ImpactBand; 5] {
        self.for_family(family).bands()
    }

    /// First band, scanning lowest to highest, containing `value`.
    ///
    /// `None` only for values outside `[0, inf)` (negative or NaN).
    pub fn try_classify(&self, value: f64, family: MetricFamily) -> Option<ImpactCategory> {
        self.bands(family)
            .into_iter()
            .find(|band| band.contains(value))
            .map(|band| band.category)
    }

    /// Classify a value known to be finite and non-negative.
    ///
    /// # Panics
    ///
    /// Panics when no band matches. Loaded posts are validated to be in range,
    /// so a miss means the table or the caller broke an invariant.
    pub fn classify(&self, value: f64, family: MetricFamily) -> ImpactCategory {
        match self.try_classify(value, family) {
            Some(category) => category,
            None => panic!("impact bands for {family} do not cover value {value}"),
        }
    }

    pub fn classify_post(&self, post: &Post, family: MetricFamily) -> ImpactCategory {
        self.classify(family.value_of(post), family)
    }

    pub fn validate(&self) -> Result<()> {
        for family in MetricFamily::all() {
            self.for_family(*family).validate(*family)?;
        }
        Ok(())
    }
}
