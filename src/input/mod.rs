//! Readers for the grid files a mosaic run consumes.

pub mod mosaic;
pub mod overlap;
pub mod topog;

pub use mosaic::{read_supergrid_tile, CoupledMosaic, SoloMosaic};
pub use overlap::{read_overlap_file, read_overlap_files};
pub use topog::read_topography;
