//! Tile data structure.

use serde::{Deserialize, Serialize};

use super::field::{CellIndex, Field2D};
use super::spherical::{grid_cell_areas, AreaFormula};

/// One logical grid surface of a mosaic with its own cell index space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Tile identifier from the mosaic (e.g., "tile1").
    pub name: String,
    /// Physical area of each cell in m².
    pub cell_area: Field2D,
}

impl Tile {
    /// Creates a tile from precomputed cell areas.
    pub fn new(name: impl Into<String>, cell_area: Field2D) -> Self {
        Self {
            name: name.into(),
            cell_area,
        }
    }

    /// Creates a tile from corner coordinates in degrees.
    ///
    /// `lon_deg` and `lat_deg` are row-major with shape `(ny + 1, nx + 1)`.
    ///
    /// # Returns
    /// `None` if the corner arrays do not match the requested shape.
    pub fn from_corners_deg(
        name: impl Into<String>,
        nx: usize,
        ny: usize,
        lon_deg: &[f64],
        lat_deg: &[f64],
        formula: AreaFormula,
    ) -> Option<Self> {
        let corners = (nx + 1) * (ny + 1);
        if lon_deg.len() != corners || lat_deg.len() != corners {
            return None;
        }
        let lonb: Vec<f64> = lon_deg.iter().map(|d| d.to_radians()).collect();
        let latb: Vec<f64> = lat_deg.iter().map(|d| d.to_radians()).collect();
        Some(Self::new(name, grid_cell_areas(nx, ny, &lonb, &latb, formula)))
    }

    /// Number of cells along `i`.
    pub fn nx(&self) -> usize {
        self.cell_area.nx()
    }

    /// Number of cells along `j`.
    pub fn ny(&self) -> usize {
        self.cell_area.ny()
    }

    /// Returns the total number of cells in this tile.
    pub fn cell_count(&self) -> usize {
        self.cell_area.len()
    }

    /// Returns the area of one cell, or `None` if out of bounds.
    pub fn area_at(&self, cell: CellIndex) -> Option<f64> {
        self.cell_area.get(cell)
    }

    /// Returns the file-name suffix for this tile's position, e.g. `_tile2`.
    ///
    /// Single-tile mosaics get no suffix.
    pub fn suffix(index: usize, ntiles: usize) -> String {
        if ntiles > 1 {
            format!("_tile{}", index + 1)
        } else {
            String::new()
        }
    }
}
