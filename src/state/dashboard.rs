//! Loaded documents plus memoized, pull-based derivations.

use super::memo::Memo;
use super::{reduce, Action, ViewState};
use crate::core::{ArtistDirectory, Dataset, MedianStrategy, Metric, Platform, Post};
use crate::distribution::{distribution_outline, jitter_points, Distribution};
use crate::errors::Result;
use crate::impact::{ImpactThresholds, MetricFamily};
use crate::io::export::{export_file_name, monthly_csv};
use crate::io::source::DocumentSource;
use crate::pipeline::{paginate, select_posts, Page, PostQuery, SortSpec, YearFilter};
use crate::views::{
    artist_posts, available_years, evolution_series, impact_breakdown, impact_by_month,
    rank_artists, summarize, ArtistQuery, ArtistRow, EvolutionPoint, ImpactBreakdown,
    MetricCards, MonthImpact,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Inputs that are fixed for the lifetime of a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub thresholds: ImpactThresholds,
    pub median: MedianStrategy,
    pub artist_limit: usize,
    pub page_size: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            thresholds: ImpactThresholds::default(),
            median: MedianStrategy::default(),
            artist_limit: crate::views::artists::DEFAULT_ARTIST_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Every memo key starts with the document generation, so nothing computed
/// from a replaced dataset can be returned afterwards.
#[derive(Default)]
struct Memos {
    summary: Memo<(u64, Option<String>), MetricCards>,
    evolution: Memo<(u64, Metric, YearFilter), Vec<EvolutionPoint>>,
    impact_by_month: Memo<(u64, MetricFamily, YearFilter), Vec<MonthImpact>>,
    breakdown: Memo<(u64, Option<String>, MetricFamily), ImpactBreakdown>,
    distribution: Memo<(u64, Option<String>, MetricFamily), Distribution>,
    posts: Memo<(u64, PostQuery), Vec<Post>>,
    artist_ranking: Memo<(u64, Platform, ArtistQuery), Vec<ArtistRow>>,
    artist_posts: Memo<(u64, String, SortSpec), Vec<Post>>,
    years: Memo<u64, Vec<String>>,
    export: Memo<u64, String>,
}

impl Memos {
    fn clear(&self) {
        self.summary.clear();
        self.evolution.clear();
        self.impact_by_month.clear();
        self.breakdown.clear();
        self.distribution.clear();
        self.posts.clear();
        self.artist_ranking.clear();
        self.artist_posts.clear();
        self.years.clear();
        self.export.clear();
    }
}

pub struct Dashboard<S: DocumentSource> {
    source: S,
    settings: DashboardSettings,
    state: ViewState,
    /// Platform whose document is currently loaded, if any.
    loaded: Option<Platform>,
    dataset: Arc<Dataset>,
    artists: Arc<ArtistDirectory>,
    generation: u64,
    memos: Memos,
}

impl<S: DocumentSource> Dashboard<S> {
    /// Empty dashboard; artist stats are loaded once here.
    ///
    /// A failed artist load is logged and leaves the directory empty.
    pub fn new(source: S, settings: DashboardSettings, state: ViewState) -> Self {
        let artists = match source.load_artists() {
            Ok(artists) => artists,
            Err(e) => {
                warn!("Failed to load artist stats: {e}. Artist ranking will be empty.");
                ArtistDirectory::default()
            }
        };

        Self {
            source,
            settings,
            state,
            loaded: None,
            dataset: Arc::new(Dataset::default()),
            artists: Arc::new(artists),
            generation: 0,
            memos: Memos::default(),
        }
    }

    /// Build a dashboard and load the document for `state.platform`.
    pub fn open(source: S, settings: DashboardSettings, state: ViewState) -> Result<Self> {
        let platform = state.platform;
        let mut dashboard = Self::new(source, settings, state);
        dashboard.load(platform)?;
        Ok(dashboard)
    }

    /// Like [`open`](Self::open), but a document that cannot be read or
    /// decoded leaves the dashboard empty instead of failing.
    pub fn open_or_empty(source: S, settings: DashboardSettings, state: ViewState) -> Result<Self> {
        let platform = state.platform;
        let mut dashboard = Self::new(source, settings, state);
        match dashboard.load(platform) {
            Err(e) if !e.is_load_failure() => Err(e),
            _ => Ok(dashboard),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn artists(&self) -> &ArtistDirectory {
        &self.artists
    }

    pub fn loaded_platform(&self) -> Option<Platform> {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the dataset with `platform`'s document.
    ///
    /// On failure the previous dataset stays in place and the error is
    /// returned after being logged.
    fn load(&mut self, platform: Platform) -> Result<()> {
        match self.source.load_dataset(platform) {
            Ok(dataset) => {
                info!(
                    platform = %platform,
                    months = dataset.len(),
                    posts = dataset.total_posts(),
                    "loaded platform document"
                );
                self.dataset = Arc::new(dataset);
                self.loaded = Some(platform);
                self.generation += 1;
                self.memos.clear();
                Ok(())
            }
            Err(e) => {
                warn!(
                    category = e.category(),
                    "Failed to load {} data: {e}. Keeping previous data.",
                    platform.display_name()
                );
                Err(e)
            }
        }
    }

    /// Switch platform, loading its document.
    pub fn set_platform(&mut self, platform: Platform) -> Result<()> {
        self.dispatch(Action::SetPlatform(platform))
    }

    /// Apply an action. A platform change loads the new document first; if
    /// that fails the whole action is dropped.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let switching = matches!(action, Action::SetPlatform(_));
        let next = reduce(&self.state, action);
        if switching && self.loaded != Some(next.platform) {
            self.load(next.platform)?;
        }
        self.state = next;
        Ok(())
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<()> {
        actions
            .into_iter()
            .try_for_each(|action| self.dispatch(action))
    }

    pub fn summary(&self) -> Arc<MetricCards> {
        let month = self.state.selected_month.clone();
        self.memos
            .summary
            .get_or_compute((self.generation, month.clone()), || {
                summarize(&self.dataset, month.as_deref())
            })
    }

    pub fn evolution(&self) -> Arc<Vec<EvolutionPoint>> {
        let metric = self.state.evolution_metric;
        let year = self.state.year.clone();
        self.memos
            .evolution
            .get_or_compute((self.generation, metric, year.clone()), || {
                evolution_series(&self.dataset, metric, &year, self.settings.median)
            })
    }

    pub fn impact_by_month(&self) -> Arc<Vec<MonthImpact>> {
        let family = self.state.family();
        let year = self.state.year.clone();
        self.memos
            .impact_by_month
            .get_or_compute((self.generation, family, year.clone()), || {
                impact_by_month(&self.dataset, family, &year, &self.settings.thresholds)
            })
    }

    /// Posts shown by the distribution and the category breakdown: the
    /// selected month, or everything.
    fn focus_posts(&self) -> Vec<&Post> {
        match self
            .state
            .selected_month
            .as_deref()
            .and_then(|m| self.dataset.get(m))
        {
            Some(bucket) => bucket.all_videos.iter().collect(),
            None => self.dataset.posts().collect(),
        }
    }

    pub fn impact_breakdown(&self) -> Arc<ImpactBreakdown> {
        let family = self.state.family();
        let key = (self.generation, self.state.selected_month.clone(), family);
        self.memos.breakdown.get_or_compute(key, || {
            impact_breakdown(self.focus_posts(), family, &self.settings.thresholds)
        })
    }

    /// Histogram and scatter for the selected month or all posts.
    ///
    /// The outline is memoized; scatter jitter is redrawn on every call.
    pub fn distribution(&self) -> Distribution {
        let family = self.state.family();
        let key = (self.generation, self.state.selected_month.clone(), family);
        let outline = self.memos.distribution.get_or_compute(key, || {
            distribution_outline(self.focus_posts(), family, self.settings.median)
        });
        let mut distribution = (*outline).clone();
        jitter_points(&mut distribution, &mut rand::rng());
        distribution
    }

    pub fn posts(&self) -> Arc<Vec<Post>> {
        let query = self.state.post_query();
        self.memos
            .posts
            .get_or_compute((self.generation, query.clone()), || {
                let posts = select_posts(&self.dataset, &query, &self.settings.thresholds);
                debug!(matched = posts.len(), "selected posts");
                posts
            })
    }

    pub fn page(&self) -> Page<Post> {
        paginate(self.posts().as_slice(), self.state.page, self.settings.page_size)
    }

    pub fn artist_ranking(&self) -> Arc<Vec<ArtistRow>> {
        let platform = self.state.platform;
        let query = self.state.artist_query(self.settings.artist_limit);
        self.memos
            .artist_ranking
            .get_or_compute((self.generation, platform, query.clone()), || {
                rank_artists(
                    &self.artists,
                    &self.dataset,
                    platform,
                    &query,
                    self.settings.median,
                )
            })
    }

    /// Posts for the selected artist; empty when none is selected.
    pub fn artist_posts(&self) -> Arc<Vec<Post>> {
        let artist = self.state.selected_artist.clone().unwrap_or_default();
        let sort = self.state.artist_sort;
        self.memos
            .artist_posts
            .get_or_compute((self.generation, artist.clone(), sort), || {
                if artist.is_empty() {
                    Vec::new()
                } else {
                    artist_posts(&self.dataset, &artist, sort)
                }
            })
    }

    pub fn years(&self) -> Arc<Vec<String>> {
        self.memos
            .years
            .get_or_compute(self.generation, || available_years(&self.dataset))
    }

    pub fn export_csv(&self) -> Arc<String> {
        self.memos
            .export
            .get_or_compute(self.generation, || monthly_csv(&self.dataset))
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(self.state.platform)
    }
}
