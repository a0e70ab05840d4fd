//! Land area per cell from topography or from aggregated land overlaps.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::MosaicError;
use crate::grid::spherical::sphere_area;
use crate::grid::{AreaField, CellIndex, Field2D, Tile};

/// Per-cell field of a topography file.
#[derive(Debug, Clone, PartialEq)]
pub enum TopographyField {
    /// Ocean fraction of each cell in `[0, 1]`.
    AreaFraction(Field2D),
    /// Ocean depth of each cell in meters, positive down.
    Depth(Field2D),
}

/// One tile of a topography file with its declared dimensions.
#[derive(Debug, Clone)]
pub struct TopographyTile {
    pub nx: usize,
    pub ny: usize,
    pub field: TopographyField,
}

/// A topography file: declared tile count plus one entry per tile.
#[derive(Debug, Clone)]
pub struct Topography {
    pub ntiles: usize,
    pub tiles: Vec<TopographyTile>,
}

/// One sparse atmosphere×land overlap record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapRecord {
    /// Land cell receiving the area.
    pub target: CellIndex,
    /// Overlap area as a fraction of the sphere surface.
    pub area: f64,
}

/// Records read from one atmosphere×land exchange-grid file.
#[derive(Debug, Clone)]
pub struct OverlapFile {
    pub name: String,
    pub records: Vec<OverlapRecord>,
}

/// Options threaded into the topography interpretation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOptions {
    /// Cells deeper than this are ocean.
    pub sea_level: f64,
    /// Treat `area_frac` as a binary mask (only exactly 1 is ocean), as older
    /// grid tools did.
    pub reproduce_siena: bool,
}

/// Land area per tile from a topography file.
///
/// Tile counts must agree; per-tile dimensions are checked before each
/// tile is classified.
pub fn land_areas_from_topography(
    tiles: &[Tile],
    topog: &Topography,
    options: SourceOptions,
) -> Result<Vec<AreaField>, MosaicError> {
    if topog.ntiles != tiles.len() || topog.tiles.len() != tiles.len() {
        return Err(MosaicError::Consistency(format!(
            "dimlen ntiles in mosaic file ({}) is not the same as dimlen in topog file ({})",
            tiles.len(),
            topog.ntiles
        )));
    }

    tiles
        .par_iter()
        .zip(topog.tiles.par_iter())
        .map(|(tile, topog_tile)| land_area_from_topography(tile, topog_tile, options))
        .collect()
}

/// Land area for one tile from its topography entry.
pub fn land_area_from_topography(
    tile: &Tile,
    topog_tile: &TopographyTile,
    options: SourceOptions,
) -> Result<AreaField, MosaicError> {
    if topog_tile.nx != tile.nx() || topog_tile.ny != tile.ny() {
        return Err(MosaicError::Consistency(format!(
            "grid size mismatch between mosaic file and topog file for tile '{}': \
             mosaic ({}, {}), topog ({}, {})",
            tile.name,
            tile.nx(),
            tile.ny(),
            topog_tile.nx,
            topog_tile.ny
        )));
    }

    let field = match &topog_tile.field {
        TopographyField::AreaFraction(f) | TopographyField::Depth(f) => f,
    };
    if !field.same_shape(&tile.cell_area) {
        return Err(MosaicError::Consistency(format!(
            "topog field for tile '{}' has shape {:?}, expected {:?}",
            tile.name,
            field.shape(),
            tile.cell_area.shape()
        )));
    }

    let land = match &topog_tile.field {
        TopographyField::AreaFraction(frac) => {
            info!(tile = %tile.name, "land/sea mask determined by field area_frac");
            land_from_fraction(tile, frac, options.reproduce_siena)?
        }
        TopographyField::Depth(depth) => {
            info!(tile = %tile.name, sea_level = options.sea_level, "land/sea mask determined by field depth");
            Field2D::from_fn(tile.nx(), tile.ny(), |c| {
                if depth[c] > options.sea_level {
                    0.0
                } else {
                    tile.cell_area[c]
                }
            })
        }
    };

    debug!(tile = %tile.name, land_cells = land.count_positive(), "land area from topography");
    Ok(land)
}

fn land_from_fraction(tile: &Tile, frac: &Field2D, binary: bool) -> Result<AreaField, MosaicError> {
    if let Some((cell, value)) = frac.cells().find(|&(_, f)| !(0.0..=1.0).contains(&f)) {
        return Err(MosaicError::Consistency(format!(
            "area_frac = {} outside [0, 1] at tile '{}' cell ({}, {})",
            value, tile.name, cell.i, cell.j
        )));
    }

    Ok(Field2D::from_fn(tile.nx(), tile.ny(), |c| {
        let cell = tile.cell_area[c];
        let f = frac[c];
        if binary {
            if f == 1.0 {
                0.0
            } else {
                cell
            }
        } else {
            cell - f * cell
        }
    }))
}

/// Checks that overlap files map onto tiles.
///
/// Supported: one file per tile, or a single-tile mosaic that takes every file.
pub fn check_overlap_ratio(ntiles: usize, nfiles: usize) -> Result<(), MosaicError> {
    if ntiles != nfiles && ntiles != 1 {
        return Err(MosaicError::Config(format!(
            "only ntiles = 1 or ntiles = nfile_aXl is supported (ntiles = {}, nfile_aXl = {})",
            ntiles, nfiles
        )));
    }
    Ok(())
}

/// Land area per tile accumulated from atmosphere×land overlap files.
///
/// Areas are converted from sphere fractions to m². Several records may
/// target the same cell; their areas add up.
pub fn land_areas_from_overlaps(
    tiles: &[Tile],
    files: &[OverlapFile],
) -> Result<Vec<AreaField>, MosaicError> {
    check_overlap_ratio(tiles.len(), files.len())?;

    let mut land: Vec<AreaField> = tiles
        .iter()
        .map(|t| Field2D::zeros(t.nx(), t.ny()))
        .collect();
    let to_m2 = sphere_area();

    for (n, file) in files.iter().enumerate() {
        let t = if tiles.len() == 1 { 0 } else { n };
        let field = &mut land[t];
        for record in &file.records {
            if !(record.area >= 0.0) {
                return Err(MosaicError::Consistency(format!(
                    "overlap file '{}' holds area {} at cell ({}, {}); areas must be non-negative",
                    file.name, record.area, record.target.i, record.target.j
                )));
            }
            field.accumulate(record.target, record.area * to_m2).ok_or_else(|| {
                MosaicError::Consistency(format!(
                    "overlap file '{}' targets cell ({}, {}) outside tile '{}' ({} x {})",
                    file.name,
                    record.target.i,
                    record.target.j,
                    tiles[t].name,
                    tiles[t].nx(),
                    tiles[t].ny()
                ))
            })?;
        }
        debug!(file = %file.name, tile = %tiles[t].name, records = file.records.len(), "aggregated overlaps");
    }

    Ok(land)
}
