mod common;

use common::{instagram_dataset, tiktok_dataset, write_documents, ARTIST_STATS};
use engagemap::io::source::parse_artists;
use engagemap::views::{evolution_series, summarize};
use engagemap::{
    Action, Dashboard, DashboardSettings, FileSource, MedianStrategy, MemorySource, Metric,
    Platform, ViewState, YearFilter,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn memory_dashboard() -> Dashboard<MemorySource> {
    let artists = parse_artists(ARTIST_STATS, Path::new("artist_stats.json")).unwrap();
    let source = MemorySource::new()
        .with_dataset(Platform::Tiktok, tiktok_dataset())
        .with_dataset(Platform::Instagram, instagram_dataset())
        .with_artists(artists);
    Dashboard::open(source, DashboardSettings::default(), ViewState::default()).unwrap()
}

#[test]
fn test_platform_switch_replaces_every_derivation() {
    let mut dashboard = memory_dashboard();
    dashboard
        .dispatch(Action::SelectMonth(Some("2025-01".into())))
        .unwrap();

    // Warm every memo on TikTok.
    assert_eq!(dashboard.summary().total_posts, 4);
    assert_eq!(dashboard.posts().len(), 4);
    assert!(!dashboard.artist_ranking().is_empty());
    assert_eq!(*dashboard.years(), vec!["2024", "2025"]);
    let tiktok_csv = dashboard.export_csv();

    dashboard.set_platform(Platform::Instagram).unwrap();

    assert_eq!(dashboard.state().selected_month, None);
    assert_eq!(dashboard.summary().total_posts, 1);
    assert!(dashboard.posts().iter().all(|p| p.date.starts_with("2023")));
    assert_eq!(*dashboard.years(), vec!["2023"]);
    assert_ne!(dashboard.export_csv(), tiktok_csv);
    assert!(dashboard.evolution().iter().all(|p| p.month == "2023-06"));
    assert_eq!(dashboard.export_file_name(), "evolucion_mensual_Instagram.csv");

    // Instagram ranking only sees instagram aggregates.
    dashboard.dispatch(Action::SetMinVideos(1)).unwrap();
    let ranking = dashboard.artist_ranking();
    let names: Vec<&str> = ranking.iter().map(|r| r.artist.as_str()).collect();
    assert_eq!(names, vec!["Mon Laferte"]);
}

#[test]
fn test_failed_switch_keeps_previous_data_and_state() {
    let artists = parse_artists(ARTIST_STATS, Path::new("artist_stats.json")).unwrap();
    let source = MemorySource::new()
        .with_dataset(Platform::Tiktok, tiktok_dataset())
        .with_artists(artists);
    let mut dashboard =
        Dashboard::open(source, DashboardSettings::default(), ViewState::default()).unwrap();
    dashboard
        .dispatch(Action::SelectMonth(Some("2025-02".into())))
        .unwrap();
    let before = dashboard.summary();
    let generation = dashboard.generation();

    assert!(dashboard.set_platform(Platform::Instagram).is_err());

    assert_eq!(dashboard.state().platform, Platform::Tiktok);
    assert_eq!(dashboard.state().selected_month.as_deref(), Some("2025-02"));
    assert_eq!(dashboard.loaded_platform(), Some(Platform::Tiktok));
    assert_eq!(dashboard.generation(), generation);
    assert_eq!(*dashboard.summary(), *before);
}

#[test]
fn test_memoized_output_equals_fresh_derivation() {
    let mut dashboard = memory_dashboard();
    dashboard
        .dispatch_all([
            Action::SetEvolutionMetric(Metric::MedianIr),
            Action::SetYearFilter(YearFilter::Year("2025".into())),
        ])
        .unwrap();

    let cached = dashboard.evolution();
    let again = dashboard.evolution();
    let fresh = evolution_series(
        &tiktok_dataset(),
        Metric::MedianIr,
        &YearFilter::Year("2025".into()),
        MedianStrategy::UpperMiddle,
    );
    assert_eq!(*cached, fresh);
    assert_eq!(*again, fresh);
    assert_eq!(*dashboard.summary(), summarize(&tiktok_dataset(), None));
}

#[test]
fn test_file_source_round_trip() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path());

    let mut dashboard = Dashboard::open(
        FileSource::new(dir.path()),
        DashboardSettings::default(),
        ViewState::default(),
    )
    .unwrap();
    assert_eq!(dashboard.dataset().total_posts(), 8);
    assert_eq!(dashboard.artists().len(), 3);

    // A broken document on disk leaves the loaded one in place.
    fs::write(dir.path().join("data_instagram.json"), "{ not json").unwrap();
    assert!(dashboard.set_platform(Platform::Instagram).is_err());
    assert_eq!(dashboard.dataset().total_posts(), 8);
}
