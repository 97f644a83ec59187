//! Dashboard view models derived from a loaded dataset.
//!
//! Every function is a pure projection of its arguments; ordering is always
//! made explicit because the underlying month map has none.

pub mod artists;
pub mod breakdown;
pub mod evolution;
pub mod summary;

pub use artists::{artist_posts, rank_artists, ArtistQuery, ArtistRow};
pub use breakdown::{annotate_posts, impact_breakdown, CategoryShare, ImpactBreakdown, PostRow};
pub use evolution::{bucket_metric, evolution_series, impact_by_month, EvolutionPoint, MonthImpact};
pub use summary::{available_years, cards_for, summarize, MetricCards};
