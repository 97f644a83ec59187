use crate::io::{write_csv, DocumentSource};
use crate::state::Dashboard;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Where the CSV goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Stdout,
    /// A file; `None` uses the platform's default file name.
    File(Option<PathBuf>),
}

/// Write the monthly CSV, returning the file written (if any).
pub fn export_csv<S: DocumentSource>(
    dashboard: &Dashboard<S>,
    target: &ExportTarget,
) -> Result<Option<PathBuf>> {
    let csv = dashboard.export_csv();
    match target {
        ExportTarget::Stdout => {
            println!("{csv}");
            Ok(None)
        }
        ExportTarget::File(path) => {
            let path = path
                .clone()
                .unwrap_or_else(|| PathBuf::from(dashboard.export_file_name()));
            write_csv(&path, &csv).with_context(|| format!("exporting {}", path.display()))?;
            info!(path = %path.display(), months = dashboard.dataset().len(), "exported CSV");
            Ok(Some(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::post;
    use crate::core::{Dataset, MonthBucket, Platform};
    use crate::io::MemorySource;
    use crate::state::{DashboardSettings, ViewState};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_export_uses_platform_file_name() {
        let dataset = Dataset::from_months([
            ("2025-02", MonthBucket::from_posts(vec![post("2025-02-01", 10, 1, 1.0)])),
            ("2025-01", MonthBucket::from_posts(vec![post("2025-01-01", 20, 2, 2.0)])),
        ]);
        let source = MemorySource::new().with_dataset(Platform::Instagram, dataset);
        let state = ViewState {
            platform: Platform::Instagram,
            ..ViewState::default()
        };
        let dashboard = Dashboard::open(source, DashboardSettings::default(), state).unwrap();

        let dir = TempDir::new().unwrap();
        let target = ExportTarget::File(Some(dir.path().join(dashboard.export_file_name())));
        let path = export_csv(&dashboard, &target).unwrap().unwrap();
        assert!(path.ends_with("evolucion_mensual_Instagram.csv"));

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2025-01,"));
        assert!(lines[2].starts_with("2025-02,"));
    }
}
