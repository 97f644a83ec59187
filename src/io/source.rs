//! Where documents come from.
//!
//! The dashboard only talks to [`DocumentSource`]; the CLI uses
//! [`FileSource`] over a data directory and tests use [`MemorySource`].

use crate::core::{ArtistDirectory, Dataset, Platform};
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ARTIST_DOCUMENT: &str = "artist_stats.json";

/// Supplies the month-keyed document per platform and the artist directory.
///
/// Implementations must return fully validated values: every month key is
/// `YYYY-MM` and every post has a calendar date and a finite non-negative
/// interaction rate.
pub trait DocumentSource: Send + Sync {
    fn load_dataset(&self, platform: Platform) -> Result<Dataset>;

    fn load_artists(&self) -> Result<ArtistDirectory>;
}

pub fn parse_dataset(contents: &str, path: &Path) -> Result<Dataset> {
    let dataset: Dataset =
        serde_json::from_str(contents).map_err(|e| Error::parse(path, e))?;
    dataset.validate()?;
    Ok(dataset)
}

pub fn parse_artists(contents: &str, path: &Path) -> Result<ArtistDirectory> {
    serde_json::from_str(contents).map_err(|e| Error::parse(path, e))
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io("failed to read document", path, e))
}

/// Documents read from `data_<platform>.json` and `artist_stats.json` in a
/// directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dataset_path(&self, platform: Platform) -> PathBuf {
        self.root.join(platform.document_name())
    }

    pub fn artists_path(&self) -> PathBuf {
        self.root.join(ARTIST_DOCUMENT)
    }
}

impl DocumentSource for FileSource {
    fn load_dataset(&self, platform: Platform) -> Result<Dataset> {
        let path = self.dataset_path(platform);
        let dataset = parse_dataset(&read_document(&path)?, &path)?;
        debug!(
            path = %path.display(),
            months = dataset.len(),
            posts = dataset.total_posts(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    fn load_artists(&self) -> Result<ArtistDirectory> {
        let path = self.artists_path();
        let artists = parse_artists(&read_document(&path)?, &path)?;
        debug!(path = %path.display(), artists = artists.len(), "loaded artist stats");
        Ok(artists)
    }
}

/// In-memory documents; a missing platform behaves like a missing file.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<Platform, Dataset>,
    artists: Option<ArtistDirectory>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, platform: Platform, dataset: Dataset) -> Self {
        self.datasets.insert(platform, dataset);
        self
    }

    pub fn with_artists(mut self, artists: ArtistDirectory) -> Self {
        self.artists = Some(artists);
        self
    }

    fn missing(name: String) -> Error {
        Error::io(
            "document not available",
            name,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        )
    }
}

impl DocumentSource for MemorySource {
    fn load_dataset(&self, platform: Platform) -> Result<Dataset> {
        let dataset = self
            .datasets
            .get(&platform)
            .cloned()
            .ok_or_else(|| Self::missing(platform.document_name()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn load_artists(&self) -> Result<ArtistDirectory> {
        self.artists
            .clone()
            .ok_or_else(|| Self::missing(ARTIST_DOCUMENT.to_string()))
    }
}
