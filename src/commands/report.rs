//! Translating report subcommands into view-state actions and reports.
//!
//! Flags never reach the derivations directly: each one becomes an
//! [`Action`] replayed through the reducer, so a CLI invocation sees exactly
//! the state an interactive session would after the same clicks.

use crate::cli::Commands;
use crate::io::{DocumentSource, Report};
use crate::pipeline::{Page, SortField, SortSpec};
use crate::state::{Action, Dashboard, DashboardSettings, Tab, ViewState};
use crate::views::annotate_posts;
use tracing::warn;

/// Header clicks that turn `current` into `target`.
pub fn sort_clicks(current: SortSpec, target: SortSpec) -> Vec<SortField> {
    let mut clicks = Vec::new();
    let mut spec = current;
    // Two clicks reach any spec: one to switch column, one to flip.
    while spec != target && clicks.len() < 2 {
        spec = spec.clicked(target.field);
        clicks.push(target.field);
    }
    clicks
}

/// Actions that put `base` into the state a report command asks for.
pub fn command_actions(command: &Commands, base: &ViewState) -> Vec<Action> {
    match command {
        Commands::Summary { month } => vec![Action::SelectMonth(month.clone())],
        Commands::Evolution { metric, year } => vec![
            Action::SetTab(Tab::Evolution),
            Action::SetEvolutionMetric(*metric),
            Action::SetYearFilter(year.clone()),
        ],
        Commands::Impact {
            metric,
            month,
            year,
            by_month,
        } => {
            let mut actions = vec![
                Action::SetEvolutionMetric(*metric),
                Action::SetYearFilter(year.clone()),
                Action::SelectMonth(month.clone()),
            ];
            if *by_month != base.show_impact_view {
                actions.push(Action::ToggleImpactView);
            }
            actions
        }
        Commands::Distribution { metric, month } => vec![
            Action::SetEvolutionMetric(*metric),
            Action::SelectMonth(month.clone()),
        ],
        Commands::Posts {
            year,
            month,
            impact,
            metric,
            search,
            sort,
            order,
            page,
            ..
        } => {
            let mut actions = vec![
                Action::SetYearFilter(year.clone()),
                Action::SelectMonth(month.clone()),
                Action::SetEvolutionMetric(*metric),
                Action::SetImpactFilter(*impact),
                Action::SetSearch(search.clone()),
            ];
            actions.extend(
                sort_clicks(base.sort, SortSpec::new(*sort, *order))
                    .into_iter()
                    .map(Action::SetSort),
            );
            actions.push(Action::SetPage(page.saturating_sub(1)));
            actions
        }
        Commands::Artists {
            metric,
            year,
            min_videos,
            exclude,
            ..
        } => {
            let mut actions = vec![
                Action::SetTab(Tab::Artist),
                Action::SetArtistMetric(*metric),
                Action::SetArtistExclusion(exclude.clone()),
            ];
            if let Some(year) = year {
                actions.push(Action::SetArtistYear(year.clone()));
            }
            if let Some(min) = min_videos {
                actions.push(Action::SetMinVideos(*min));
            }
            actions
        }
        Commands::Artist {
            name,
            metric,
            sort,
            order,
        } => {
            let mut actions = vec![
                Action::SetTab(Tab::Artist),
                Action::SetEvolutionMetric(*metric),
                Action::SelectArtist(Some(name.clone())),
            ];
            actions.extend(
                sort_clicks(base.artist_sort, SortSpec::new(*sort, *order))
                    .into_iter()
                    .map(Action::SetArtistSort),
            );
            actions
        }
        Commands::Years | Commands::Export { .. } | Commands::Init { .. } => Vec::new(),
    }
}

/// Settings a command overrides for its own run.
pub fn apply_overrides(command: &Commands, settings: &mut DashboardSettings) {
    match command {
        Commands::Posts {
            page_size: Some(size),
            ..
        } => settings.page_size = (*size).max(1),
        Commands::Artists {
            limit: Some(limit), ..
        } => settings.artist_limit = (*limit).max(1),
        _ => {}
    }
}

fn warn_unknown_month<S: DocumentSource>(dashboard: &Dashboard<S>) {
    if let Some(month) = dashboard.state().selected_month.as_deref() {
        if dashboard.dataset().get(month).is_none() {
            warn!("Month {month} is not in the data. Showing all months.");
        }
    }
}

/// The report for `command` from a dashboard already in the matching state.
///
/// Returns `None` for commands that do not print a report.
pub fn build_report<S: DocumentSource>(command: &Commands, dashboard: &Dashboard<S>) -> Option<Report> {
    let state = dashboard.state();
    let platform = state.platform;
    let thresholds = &dashboard.settings().thresholds;

    let report = match command {
        Commands::Summary { .. } => {
            warn_unknown_month(dashboard);
            Report::Summary {
                platform,
                month: state.selected_month.clone(),
                cards: *dashboard.summary(),
            }
        }
        Commands::Evolution { .. } => Report::Evolution {
            platform,
            metric: state.evolution_metric,
            points: dashboard.evolution().to_vec(),
        },
        Commands::Impact { .. } => {
            warn_unknown_month(dashboard);
            Report::Impact {
                platform,
                month: state.selected_month.clone(),
                breakdown: (*dashboard.impact_breakdown()).clone(),
                by_month: state
                    .show_impact_view
                    .then(|| dashboard.impact_by_month().to_vec()),
            }
        }
        Commands::Distribution { .. } => {
            warn_unknown_month(dashboard);
            Report::Distribution {
                platform,
                month: state.selected_month.clone(),
                distribution: dashboard.distribution(),
            }
        }
        Commands::Posts { .. } => {
            let page = dashboard.page();
            Report::Posts {
                platform,
                family: state.family(),
                sort: state.sort,
                page: Page {
                    items: annotate_posts(page.items, state.family(), thresholds),
                    page: page.page,
                    page_count: page.page_count,
                    total: page.total,
                },
            }
        }
        Commands::Artists { .. } => Report::Artists {
            platform,
            metric: state.artist_metric,
            rows: dashboard.artist_ranking().to_vec(),
        },
        Commands::Artist { name, .. } => Report::ArtistPosts {
            platform,
            artist: name.clone(),
            family: state.family(),
            sort: state.artist_sort,
            posts: annotate_posts(
                dashboard.artist_posts().iter().cloned(),
                state.family(),
                thresholds,
            ),
        },
        Commands::Years => Report::Years {
            platform,
            years: dashboard.years().to_vec(),
        },
        Commands::Export { .. } | Commands::Init { .. } => return None,
    };
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::post_by;
    use crate::core::{
        ArtistAggregate, ArtistDirectory, ArtistStats, Dataset, Metric, MonthBucket, Platform,
    };
    use crate::impact::{ImpactCategory, MetricFamily};
    use crate::io::MemorySource;
    use crate::pipeline::{ImpactFilter, SortDirection, YearFilter};
    use crate::state::reduce_all;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn dashboard(command: &Commands) -> Dashboard<MemorySource> {
        let dataset = Dataset::from_months([
            (
                "2024-12",
                MonthBucket::from_posts(vec![post_by("2024-12-20", "Ana Tijoux", 9_000, 12.0)]),
            ),
            (
                "2025-01",
                MonthBucket::from_posts(vec![
                    post_by("2025-01-02", "Ana Tijoux", 2_000_000, 30.0),
                    post_by("2025-01-05", "Mon Laferte", 500, 1.0),
                    post_by("2025-01-09", "Ana Tijoux", 3_000_000, 40.0),
                ]),
            ),
        ]);
        let aggregate = ArtistAggregate {
            total_videos: 3,
            avg_views: 1_669_666.0,
            avg_likes: 0.0,
            avg_ir: 27.3,
            total_views: 5_009_000,
            total_likes: 0,
        };
        let artists = ArtistDirectory::new(HashMap::from([(
            "Ana Tijoux".to_string(),
            ArtistStats {
                tiktok: Some(aggregate),
                instagram: None,
            },
        )]));
        let source = MemorySource::new()
            .with_dataset(Platform::Tiktok, dataset)
            .with_artists(artists);

        let base = ViewState::default();
        let mut settings = DashboardSettings::default();
        apply_overrides(command, &mut settings);
        let mut dashboard = Dashboard::open(source, settings, base.clone()).unwrap();
        dashboard
            .dispatch_all(command_actions(command, &base))
            .unwrap();
        dashboard
    }

    #[test]
    fn test_sort_clicks_reach_every_spec() {
        let start = SortSpec::descending(SortField::Date);
        for field in SortField::all() {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let target = SortSpec::new(*field, direction);
                let reached = sort_clicks(start, target)
                    .into_iter()
                    .fold(start, |spec, f| spec.clicked(f));
                assert_eq!(reached, target);
            }
        }
        assert!(sort_clicks(start, start).is_empty());
    }

    #[test]
    fn test_posts_flags_become_state() {
        let command = Commands::Posts {
            year: YearFilter::Year("2025".into()),
            month: None,
            impact: ImpactFilter::Only(ImpactCategory::VeryHigh),
            metric: Metric::AvgIr,
            search: None,
            sort: SortField::Views,
            order: SortDirection::Desc,
            page: 1,
            page_size: None,
        };
        let state = reduce_all(
            &ViewState::default(),
            command_actions(&command, &ViewState::default()),
        );
        assert_eq!(state.year, YearFilter::Year("2025".into()));
        assert_eq!(state.impact, ImpactFilter::Only(ImpactCategory::VeryHigh));
        assert_eq!(state.sort, SortSpec::descending(SortField::Views));
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_posts_report_is_filtered_and_annotated() {
        let command = Commands::Posts {
            year: YearFilter::Year("2025".into()),
            month: None,
            impact: ImpactFilter::Only(ImpactCategory::VeryHigh),
            metric: Metric::AvgIr,
            search: None,
            sort: SortField::Views,
            order: SortDirection::Desc,
            page: 1,
            page_size: Some(1),
        };
        let report = build_report(&command, &dashboard(&command)).unwrap();
        match report {
            Report::Posts { page, family, .. } => {
                assert_eq!(family, MetricFamily::InteractionRate);
                assert_eq!(page.total, 2);
                assert_eq!(page.page_count, 2);
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.items[0].post.views, 3_000_000);
                assert_eq!(page.items[0].impact, ImpactCategory::VeryHigh);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_impact_by_month_only_when_asked() {
        let without = Commands::Impact {
            metric: Metric::AvgViews,
            month: None,
            year: YearFilter::All,
            by_month: false,
        };
        match build_report(&without, &dashboard(&without)).unwrap() {
            Report::Impact {
                by_month,
                breakdown,
                ..
            } => {
                assert!(by_month.is_none());
                assert_eq!(breakdown.family, MetricFamily::Views);
                assert_eq!(breakdown.total, 4);
            }
            other => panic!("unexpected report {other:?}"),
        }

        let with = Commands::Impact {
            metric: Metric::AvgViews,
            month: None,
            year: YearFilter::Year("2025".into()),
            by_month: true,
        };
        match build_report(&with, &dashboard(&with)).unwrap() {
            Report::Impact { by_month, .. } => {
                let months = by_month.unwrap();
                assert_eq!(months.len(), 1);
                assert_eq!(months[0].month, "2025-01");
                assert_eq!(months[0].total(), 3);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_artist_report_sorted_by_requested_column() {
        let command = Commands::Artist {
            name: "Ana Tijoux".into(),
            metric: Metric::AvgIr,
            sort: SortField::Date,
            order: SortDirection::Asc,
        };
        match build_report(&command, &dashboard(&command)).unwrap() {
            Report::ArtistPosts { posts, sort, .. } => {
                assert_eq!(sort, SortSpec::new(SortField::Date, SortDirection::Asc));
                let dates: Vec<&str> = posts.iter().map(|r| r.post.date.as_str()).collect();
                assert_eq!(dates, vec!["2024-12-20", "2025-01-02", "2025-01-09"]);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_artists_limit_override() {
        let command = Commands::Artists {
            metric: Metric::AvgViews,
            year: None,
            min_videos: Some(1),
            exclude: None,
            limit: Some(0),
        };
        let dashboard = dashboard(&command);
        assert_eq!(dashboard.settings().artist_limit, 1);
        match build_report(&command, &dashboard).unwrap() {
            Report::Artists { rows, metric, .. } => {
                assert_eq!(metric, Metric::AvgViews);
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].artist, "Ana Tijoux");
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_summary_and_years() {
        let command = Commands::Summary {
            month: Some("2024-12".into()),
        };
        match build_report(&command, &dashboard(&command)).unwrap() {
            Report::Summary { cards, month, .. } => {
                assert_eq!(month.as_deref(), Some("2024-12"));
                assert_eq!(cards.total_posts, 1);
            }
            other => panic!("unexpected report {other:?}"),
        }

        match build_report(&Commands::Years, &dashboard(&Commands::Years)).unwrap() {
            Report::Years { years, .. } => assert_eq!(years, vec!["2024", "2025"]),
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_non_report_commands() {
        let command = Commands::Init { force: false };
        assert!(command_actions(&command, &ViewState::default()).is_empty());
        assert!(build_report(&command, &dashboard(&command)).is_none());
    }
}
