//! Export module for writing coupler grid files.
//!
//! Fraction files and exchange grids are written per tile; the manifest
//! ties them together and is written last.

mod manifest;
mod mask;
mod metadata;
mod xgrid;

pub use manifest::{MosaicManifest, LOCAL_DIR};
pub use mask::{area_fraction, export_mosaic_masks, export_tile_masks, mask_dataset, mask_file_name};
pub use metadata::{FileMetadata, GRID_VERSION};
pub use xgrid::{export_tile_exchange_grids, exchange_grid_dataset, write_exchange_grid};
