//! Dataset storage backends.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use super::dataset::Dataset;
use super::error::DatasetError;

/// Reads and writes whole datasets by path.
///
/// The mosaic pipeline only talks to grid files through this trait, so the
/// same code runs against netCDF files on disk or an in-memory map.
pub trait DatasetStore {
    /// Reads the dataset at `path`.
    fn read(&self, path: &Path) -> Result<Dataset, DatasetError>;

    /// Writes `dataset` to `path`, replacing any existing dataset.
    fn write(&mut self, path: &Path, dataset: &Dataset) -> Result<(), DatasetError>;

    /// Returns true if a dataset exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns true if `a` and `b` name the same file or directory.
    ///
    /// The default compares paths lexically; file-backed stores resolve them.
    fn same_location(&self, a: &Path, b: &Path) -> bool {
        normalize(a) == normalize(b)
    }

    /// Copies the dataset at `from` to `to`. Copying onto itself is a no-op.
    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), DatasetError> {
        let dataset = self.read(from)?;
        if self.same_location(from, to) {
            return Ok(());
        }
        self.write(to, &dataset)
    }
}

/// Drops `.` components so `grid/./a`, `./grid/a` and `grid/a` compare equal.
/// An empty path and `.` both normalize to the empty path.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Map-backed store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    datasets: HashMap<PathBuf, Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a dataset, builder style.
    pub fn with(mut self, path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        self.datasets.insert(path.into(), dataset);
        self
    }

    /// Returns a stored dataset by reference.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Dataset> {
        self.datasets.get(path.as_ref())
    }

    /// Returns the number of stored datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Returns all stored paths, sorted.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.datasets.keys().map(|p| p.as_path()).collect();
        paths.sort();
        paths
    }
}

impl DatasetStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Dataset, DatasetError> {
        self.datasets
            .get(path)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound(path.to_path_buf()))
    }

    fn write(&mut self, path: &Path, dataset: &Dataset) -> Result<(), DatasetError> {
        self.datasets.insert(path.to_path_buf(), dataset.clone());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.datasets.contains_key(path)
    }
}
