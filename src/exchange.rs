//! Sparse exchange grids between coincident component grids.
//!
//! Atmosphere, land and ocean share one grid here, so every exchange cell
//! maps a cell onto itself and carries that cell's land or ocean area.

use serde::{Deserialize, Serialize};

use crate::grid::{AreaField, CellIndex, ExchangePair};
use crate::io::{Dataset, DatasetError};

/// One overlap between a cell of the first grid and a cell of the second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub source: CellIndex,
    pub target: CellIndex,
    /// Overlap area in m², always positive.
    pub area: f64,
    /// `(di, dj)` from the source cell centroid to the exchange cell centroid.
    pub distance1: [f64; 2],
    /// `(di, dj)` from the target cell centroid to the exchange cell centroid.
    pub distance2: [f64; 2],
}

/// Builds one-to-one exchange records for every cell with positive area.
///
/// Records follow row-major order (`j` outer, `i` inner); cells with zero
/// area are left out.
pub fn build_diagonal_exchange(field: &AreaField) -> Vec<ExchangeRecord> {
    field
        .cells()
        .filter(|&(_, area)| area > 0.0)
        .map(|(cell, area)| ExchangeRecord {
            source: cell,
            target: cell,
            area,
            distance1: [0.0, 0.0],
            distance2: [0.0, 0.0],
        })
        .collect()
}

/// The exchange grid of one pair on one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeGrid {
    pub pair: ExchangePair,
    pub tile: String,
    pub records: Vec<ExchangeRecord>,
}

impl ExchangeGrid {
    /// Builds the diagonal exchange grid of `pair` on `tile` from an area field.
    pub fn diagonal(pair: ExchangePair, tile: &str, field: &AreaField) -> Self {
        Self {
            pair,
            tile: tile.to_string(),
            records: build_diagonal_exchange(field),
        }
    }

    /// Contact specification, e.g. `atmos_mosaic:tile1::land_mosaic:tile1`.
    pub fn contact(&self) -> String {
        self.pair.contact(&self.tile)
    }

    /// Output file name, e.g. `atmos_mosaic_tile1Xland_mosaic_tile1.nc`.
    pub fn file_name(&self) -> String {
        self.pair.file_name(&self.tile)
    }

    /// Number of exchange cells.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total exchange area in m².
    pub fn total_area(&self) -> f64 {
        self.records.iter().map(|r| r.area).sum()
    }
}

/// One cell of a first-order exchange-grid file, with 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order1Cell {
    pub tile1: CellIndex,
    pub tile2: CellIndex,
    /// Area in m² as stored in the file.
    pub area: f64,
}

/// Reads the `tile1_cell`, `tile2_cell` and `xgrid_area` columns of an exchange-grid file.
///
/// A file without an `ncells` dimension has no cells.
pub fn read_order1(ds: &Dataset) -> Result<Vec<Order1Cell>, DatasetError> {
    let ncells = match ds.dim_len("ncells") {
        Some(n) => n,
        None => return Ok(Vec::new()),
    };
    if ncells == 0 {
        return Ok(Vec::new());
    }

    let tile1 = ds.i32_values("tile1_cell")?;
    let tile2 = ds.i32_values("tile2_cell")?;
    let area = ds.f64_values("xgrid_area")?;

    for (name, len, expected) in [
        ("tile1_cell", tile1.len(), 2 * ncells),
        ("tile2_cell", tile2.len(), 2 * ncells),
        ("xgrid_area", area.len(), ncells),
    ] {
        if len != expected {
            return Err(DatasetError::ShapeMismatch {
                name: name.to_string(),
                expected,
                found: len,
            });
        }
    }

    let to_cell = |name: &str, i: i32, j: i32| -> Result<CellIndex, DatasetError> {
        if i < 1 || j < 1 {
            return Err(DatasetError::InvalidValue(format!(
                "{} holds non-positive cell index ({}, {})",
                name, i, j
            )));
        }
        Ok(CellIndex::new(i as usize - 1, j as usize - 1))
    };

    (0..ncells)
        .map(|l| -> Result<Order1Cell, DatasetError> {
            Ok(Order1Cell {
                tile1: to_cell("tile1_cell", tile1[2 * l], tile1[2 * l + 1])?,
                tile2: to_cell("tile2_cell", tile2[2 * l], tile2[2 * l + 1])?,
                area: area[l],
            })
        })
        .collect()
}
