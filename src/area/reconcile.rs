//! Ocean area per cell from land area and cell area.

use rayon::prelude::*;
use tracing::{debug, error};

use crate::error::MosaicError;
use crate::grid::{AreaField, Field2D, Tile};

/// Relative slack below the cell area within which land counts as the full cell.
pub const AREA_RATIO_THRESH: f64 = 1.0e-6;
/// Relative slack above the cell area within which land counts as the full cell.
pub const AREA_RATIO_THRESH2: f64 = 1.0e-4;

/// How land area was produced, which decides how ocean area is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Topography classification: land and ocean are exclusive per cell.
    Exclusive,
    /// Aggregated overlaps: land may drift from the cell area by rounding.
    Overlap,
}

/// Land and ocean area of one tile after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct TileAreas {
    pub land: AreaField,
    pub ocean: AreaField,
}

/// Splits one cell into `(land, ocean)` areas.
///
/// In overlap mode a land area within `[cell - T1*cell, cell + T2*cell]`
/// (exclusive bounds) is snapped to the whole cell. The returned ocean area
/// may be negative or NaN; callers must reject it.
///
/// Land is recomputed from the ocean residual so that `land + ocean` rounds
/// to exactly `cell_area`.
pub fn reconcile_cell(cell_area: f64, land_area: f64, mode: ReconcileMode) -> (f64, f64) {
    if mode == ReconcileMode::Overlap
        && cell_area < land_area + AREA_RATIO_THRESH * cell_area
        && cell_area > land_area - AREA_RATIO_THRESH2 * cell_area
    {
        return (cell_area, 0.0);
    }
    let ocean = cell_area - land_area;
    (cell_area - ocean, ocean)
}

/// Derives the ocean area of one tile.
///
/// # Returns
/// The reconciled pair, or `NegativeOceanArea` for the first cell (row-major)
/// whose land exceeds its cell area beyond the snap tolerance.
pub fn reconcile_tile(
    tile: &Tile,
    land: &AreaField,
    mode: ReconcileMode,
) -> Result<TileAreas, MosaicError> {
    if !land.same_shape(&tile.cell_area) {
        return Err(MosaicError::Consistency(format!(
            "land area for tile '{}' has shape {:?}, expected {:?}",
            tile.name,
            land.shape(),
            tile.cell_area.shape()
        )));
    }

    let (nx, ny) = tile.cell_area.shape();
    let mut land_out = Field2D::zeros(nx, ny);
    let mut ocean_out = Field2D::zeros(nx, ny);

    for (c, cell_area) in tile.cell_area.cells() {
        let land_area = land[c];
        if !(land_area >= 0.0) {
            error!(tile = %tile.name, i = c.i, j = c.j, land_area, "land area is not a non-negative number");
            return Err(MosaicError::Consistency(format!(
                "land area {} at tile '{}' cell ({}, {}) is not a non-negative number",
                land_area, tile.name, c.i, c.j
            )));
        }
        let (l, o) = reconcile_cell(cell_area, land_area, mode);
        if !(o >= 0.0) {
            error!(
                tile = %tile.name, i = c.i, j = c.j,
                ocean_area = o, land_area, cell_area,
                "ocean area is negative"
            );
            return Err(MosaicError::NegativeOceanArea {
                tile: tile.name.clone(),
                i: c.i,
                j: c.j,
                ocean_area: o,
                land_area,
                cell_area,
            });
        }
        land_out[c] = l;
        ocean_out[c] = o;
    }

    debug!(
        tile = %tile.name,
        land_cells = land_out.count_positive(),
        ocean_cells = ocean_out.count_positive(),
        "reconciled tile"
    );

    Ok(TileAreas {
        land: land_out,
        ocean: ocean_out,
    })
}

/// Reconciles every tile; any failing tile aborts the whole set.
pub fn reconcile_tiles(
    tiles: &[Tile],
    land: &[AreaField],
    mode: ReconcileMode,
) -> Result<Vec<TileAreas>, MosaicError> {
    if tiles.len() != land.len() {
        return Err(MosaicError::Consistency(format!(
            "{} land area fields for {} tiles",
            land.len(),
            tiles.len()
        )));
    }
    tiles
        .par_iter()
        .zip(land.par_iter())
        .map(|(tile, land)| reconcile_tile(tile, land, mode))
        .collect()
}
