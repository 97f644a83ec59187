//! View state as an immutable record plus a reducer.
//!
//! ```text
//!   ViewState ──► reduce(state, Action) ──► ViewState
//!                                              │
//!                                              ▼
//!                                  Dashboard derivations (memoized)
//! ```
//!
//! `reduce` is total and pure: every action yields a new state and never
//! touches documents. Loading the documents a platform change needs is the
//! [`Dashboard`]'s job.

pub mod dashboard;
pub mod memo;

use crate::core::{Metric, Platform};
use crate::impact::MetricFamily;
use crate::pipeline::{ImpactFilter, PostQuery, SortField, SortSpec, YearFilter};
use crate::views::ArtistQuery;
use serde::{Deserialize, Serialize};

pub use dashboard::{Dashboard, DashboardSettings};
pub use memo::Memo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Evolution,
    Artist,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    pub platform: Platform,
    pub tab: Tab,
    pub selected_month: Option<String>,
    pub selected_artist: Option<String>,
    pub sort: SortSpec,
    pub artist_sort: SortSpec,
    pub year: YearFilter,
    pub impact: ImpactFilter,
    pub evolution_metric: Metric,
    /// Per-month impact stacks instead of the plain evolution line.
    pub show_impact_view: bool,
    pub artist_year: YearFilter,
    pub artist_metric: Metric,
    pub min_videos: u64,
    pub artist_exclusion: Option<String>,
    pub search: Option<String>,
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        let artists = ArtistQuery::default();
        Self {
            platform: Platform::default(),
            tab: Tab::default(),
            selected_month: None,
            selected_artist: None,
            sort: SortSpec::descending(SortField::Date),
            artist_sort: SortSpec::descending(SortField::Views),
            year: YearFilter::All,
            impact: ImpactFilter::All,
            evolution_metric: Metric::AvgIr,
            show_impact_view: false,
            artist_year: artists.year,
            artist_metric: artists.metric,
            min_videos: artists.min_videos,
            artist_exclusion: None,
            search: None,
            page: 0,
        }
    }
}

impl ViewState {
    /// Family the impact filter, stacks and breakdown classify against.
    pub fn family(&self) -> MetricFamily {
        self.evolution_metric.family()
    }

    pub fn post_query(&self) -> PostQuery {
        PostQuery {
            year: self.year.clone(),
            month: self.selected_month.clone(),
            impact: self.impact,
            family: self.family(),
            text: self.search.clone(),
            sort: self.sort,
        }
    }

    pub fn artist_query(&self, limit: usize) -> ArtistQuery {
        ArtistQuery {
            metric: self.artist_metric,
            year: self.artist_year.clone(),
            min_videos: self.min_videos,
            exclusion: self.artist_exclusion.clone(),
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetPlatform(Platform),
    SetTab(Tab),
    SelectMonth(Option<String>),
    SelectArtist(Option<String>),
    SetYearFilter(YearFilter),
    SetImpactFilter(ImpactFilter),
    SetEvolutionMetric(Metric),
    ToggleImpactView,
    /// Header click on the post table.
    SetSort(SortField),
    /// Header click on the artist post table.
    SetArtistSort(SortField),
    SetArtistYear(YearFilter),
    SetArtistMetric(Metric),
    SetMinVideos(u64),
    SetArtistExclusion(Option<String>),
    SetSearch(Option<String>),
    SetPage(usize),
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let mut next = state.clone();
    match action {
        Action::SetPlatform(platform) => {
            next.platform = platform;
            next.selected_month = None;
            next.selected_artist = None;
            next.page = 0;
        }
        Action::SetTab(tab) => next.tab = tab,
        Action::SelectMonth(month) => {
            next.selected_month = month.filter(|m| !m.eq_ignore_ascii_case("all"));
            next.page = 0;
        }
        Action::SelectArtist(artist) => next.selected_artist = non_blank(artist),
        Action::SetYearFilter(year) => {
            next.year = year;
            next.page = 0;
        }
        Action::SetImpactFilter(impact) => {
            next.impact = impact;
            next.page = 0;
        }
        Action::SetEvolutionMetric(metric) => {
            next.evolution_metric = metric;
            next.page = 0;
        }
        Action::ToggleImpactView => next.show_impact_view = !state.show_impact_view,
        Action::SetSort(field) => {
            next.sort = state.sort.clicked(field);
            next.page = 0;
        }
        Action::SetArtistSort(field) => next.artist_sort = state.artist_sort.clicked(field),
        Action::SetArtistYear(year) => next.artist_year = year,
        Action::SetArtistMetric(metric) => next.artist_metric = metric,
        Action::SetMinVideos(min) => next.min_videos = min,
        Action::SetArtistExclusion(word) => next.artist_exclusion = non_blank(word),
        Action::SetSearch(text) => {
            next.search = non_blank(text);
            next.page = 0;
        }
        Action::SetPage(page) => next.page = page,
    }
    next
}

/// Fold a sequence of actions over `state`.
pub fn reduce_all(state: &ViewState, actions: impl IntoIterator<Item = Action>) -> ViewState {
    actions
        .into_iter()
        .fold(state.clone(), |acc, action| reduce(&acc, action))
}
