//! Owned row-major 2-D fields over a tile's cell grid.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// A zero-based `(i, j)` cell index within a tile.
///
/// `i` runs along `nx` (fastest varying), `j` along `ny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub i: usize,
    pub j: usize,
}

impl CellIndex {
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Returns the 1-based `(i, j)` pair used in grid files.
    pub fn one_based(self) -> (i32, i32) {
        (self.i as i32 + 1, self.j as i32 + 1)
    }
}

/// A per-cell scalar field stored row-major with shape `(ny, nx)`.
///
/// All element access goes through `(i, j)` indices; the flat offset
/// `j * nx + i` never leaks out of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field2D {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

/// Land or ocean area over one tile, in the same units as the tile's cell area.
pub type AreaField = Field2D;

impl Field2D {
    /// Creates a field of zeros.
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, 0.0)
    }

    /// Creates a field with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    /// Wraps row-major data of length `nx * ny`.
    ///
    /// Returns `None` if the length does not match the shape.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != nx * ny {
            return None;
        }
        Some(Self { nx, ny, data })
    }

    /// Builds a field by evaluating `f` at every cell.
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(CellIndex) -> f64) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                data.push(f(CellIndex::new(i, j)));
            }
        }
        Self { nx, ny, data }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Returns `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if `other` has the same `(nx, ny)`.
    pub fn same_shape(&self, other: &Field2D) -> bool {
        self.shape() == other.shape()
    }

    fn offset(&self, cell: CellIndex) -> Option<usize> {
        if cell.i < self.nx && cell.j < self.ny {
            Some(cell.j * self.nx + cell.i)
        } else {
            None
        }
    }

    /// Returns the value at `cell`, or `None` if out of bounds.
    pub fn get(&self, cell: CellIndex) -> Option<f64> {
        self.offset(cell).map(|k| self.data[k])
    }

    /// Returns a mutable reference to the value at `cell`, or `None` if out of bounds.
    pub fn get_mut(&mut self, cell: CellIndex) -> Option<&mut f64> {
        let k = self.offset(cell)?;
        Some(&mut self.data[k])
    }

    /// Adds `value` to the cell, returning `None` if the cell is out of bounds.
    pub fn accumulate(&mut self, cell: CellIndex, value: f64) -> Option<()> {
        let slot = self.get_mut(cell)?;
        *slot += value;
        Some(())
    }

    /// Row-major view of the values, `j` outer and `i` inner.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Iterates `(cell, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellIndex, f64)> + '_ {
        let nx = self.nx;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, &v)| (CellIndex::new(k % nx, k / nx), v))
    }

    /// Applies `f` cell by cell against another field of the same shape.
    ///
    /// Returns `None` on a shape mismatch.
    pub fn zip_map(&self, other: &Field2D, mut f: impl FnMut(f64, f64) -> f64) -> Option<Field2D> {
        if !self.same_shape(other) {
            return None;
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Some(Field2D {
            nx: self.nx,
            ny: self.ny,
            data,
        })
    }

    /// Sum over all cells.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Number of cells with a strictly positive value.
    pub fn count_positive(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.0).count()
    }
}

impl Index<CellIndex> for Field2D {
    type Output = f64;

    fn index(&self, cell: CellIndex) -> &f64 {
        match self.offset(cell) {
            Some(k) => &self.data[k],
            None => panic!(
                "cell ({}, {}) out of bounds for field of shape ({}, {})",
                cell.i, cell.j, self.nx, self.ny
            ),
        }
    }
}

impl IndexMut<CellIndex> for Field2D {
    fn index_mut(&mut self, cell: CellIndex) -> &mut f64 {
        let (nx, ny) = self.shape();
        match self.offset(cell) {
            Some(k) => &mut self.data[k],
            None => panic!(
                "cell ({}, {}) out of bounds for field of shape ({}, {})",
                cell.i, cell.j, nx, ny
            ),
        }
    }
}
