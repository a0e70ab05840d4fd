//! Crate-level error type.

use thiserror::Error;

use crate::io::DatasetError;

/// Errors that abort a mosaic run.
#[derive(Error, Debug)]
pub enum MosaicError {
    /// Missing or malformed inputs, detected before any area is computed.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Topography or overlap data that disagrees with the mosaic grid.
    #[error("Consistency error: {0}")]
    Consistency(String),
    /// Land overlap summed to more area than the cell has.
    #[error(
        "Ocean area is negative at tile '{tile}' cell ({i}, {j}): \
         ocean_area = {ocean_area}, land_area = {land_area}, cell_area = {cell_area}"
    )]
    NegativeOceanArea {
        tile: String,
        i: usize,
        j: usize,
        ocean_area: f64,
        land_area: f64,
        cell_area: f64,
    },
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
