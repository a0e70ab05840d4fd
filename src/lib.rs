//! Coupler mosaic generator for coincident atmosphere, land and ocean grids.
//!
//! When all three components share one grid, every exchange cell is a grid
//! cell and the coupler only needs to know how much of each cell is land and
//! how much is ocean. This crate derives that split from an ocean topography
//! or from atmosphere×land overlaps, then writes fraction files, exchange
//! grids and the coupler manifest.

pub mod area;
pub mod config;
pub mod error;
pub mod exchange;
pub mod export;
pub mod grid;
pub mod input;
pub mod io;
pub mod pipeline;

pub use area::{ReconcileMode, TileAreas};
pub use config::QuickMosaicConfig;
pub use error::MosaicError;
pub use exchange::{build_diagonal_exchange, ExchangeGrid, ExchangeRecord};
pub use grid::{AreaField, CellIndex, Field2D, Tile};
pub use io::{Dataset, DatasetStore, MemoryStore, NetcdfStore};
pub use pipeline::{CouplerState, MosaicStage, Pipeline, StageId};

/// Runs the full pipeline for `config` against `store`.
pub fn run_quick_mosaic(
    config: QuickMosaicConfig,
    store: &mut dyn DatasetStore,
) -> Result<CouplerState, MosaicError> {
    Pipeline::quick_mosaic(config).run(store)
}
