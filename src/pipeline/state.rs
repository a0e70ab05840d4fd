//! Data carried between pipeline stages.

use std::path::PathBuf;

use crate::area::{OverlapFile, ReconcileMode, TileAreas, Topography};
use crate::grid::{AreaField, Tile};
use crate::input::SoloMosaic;

/// Where land area comes from.
#[derive(Debug, Clone)]
pub enum LandSource {
    /// Ocean topography classifies each cell.
    Topography { path: PathBuf, topography: Topography },
    /// Atmosphere×land overlap files are summed per land cell.
    Overlaps { files: Vec<OverlapFile> },
}

impl LandSource {
    pub fn reconcile_mode(&self) -> ReconcileMode {
        match self {
            LandSource::Topography { .. } => ReconcileMode::Exclusive,
            LandSource::Overlaps { .. } => ReconcileMode::Overlap,
        }
    }

    /// File name of the topography input, if any.
    pub fn topography_file_name(&self) -> Option<String> {
        match self {
            LandSource::Topography { path, .. } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            LandSource::Overlaps { .. } => None,
        }
    }
}

/// Inputs resolved by the load stage.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub mosaic: SoloMosaic,
    pub tiles: Vec<Tile>,
    pub source: LandSource,
}

/// Pipeline state, filled in stage by stage.
#[derive(Debug, Clone, Default)]
pub struct CouplerState {
    pub input: Option<LoadedInput>,
    /// Land area per tile before reconciliation.
    pub land: Vec<AreaField>,
    /// Reconciled land and ocean area per tile.
    pub areas: Vec<TileAreas>,
    /// Paths written so far, in write order.
    pub written: Vec<PathBuf>,
}

impl CouplerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile names in mosaic order.
    pub fn tile_names(&self) -> Vec<String> {
        self.input
            .as_ref()
            .map(|input| input.tiles.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }
}
