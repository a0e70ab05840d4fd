//! Run configuration.

use std::path::PathBuf;

use crate::error::MosaicError;

/// Default base name of the coupler mosaic file (`mosaic.nc`).
pub const DEFAULT_MOSAIC_NAME: &str = "mosaic";

/// Configuration for one coupler mosaic run.
///
/// Units:
/// - sea level: meters, compared against topography depth
/// - areas: m² on a sphere of radius [`crate::grid::RADIUS`]
#[derive(Debug, Clone)]
pub struct QuickMosaicConfig {
    // Inputs
    pub input_mosaic: PathBuf,
    /// When set, `input_mosaic` is a solo mosaic and land/sea comes from this file.
    /// Otherwise `input_mosaic` is a coupled mosaic and land comes from its aXl overlaps.
    pub ocean_topog: Option<PathBuf>,

    // Land/sea decision
    pub sea_level: f64,
    /// Reproduce the historical numerics of older grid tools.
    pub reproduce_siena: bool,

    // Outputs
    pub mosaic_name: String,
    pub output_dir: PathBuf,
    /// Written to the `history` attribute of every output file.
    pub history: String,
}

impl Default for QuickMosaicConfig {
    fn default() -> Self {
        Self {
            input_mosaic: PathBuf::new(),
            ocean_topog: None,
            sea_level: 0.0,
            reproduce_siena: false,
            mosaic_name: DEFAULT_MOSAIC_NAME.to_string(),
            output_dir: PathBuf::from("."),
            history: String::new(),
        }
    }
}

impl QuickMosaicConfig {
    /// Creates a configuration for the given input mosaic with defaults elsewhere.
    pub fn new(input_mosaic: impl Into<PathBuf>) -> Self {
        Self {
            input_mosaic: input_mosaic.into(),
            ..Self::default()
        }
    }

    /// True when land/sea is decided by an ocean topography file.
    pub fn uses_ocean_topog(&self) -> bool {
        self.ocean_topog.is_some()
    }

    /// File name of the coupler mosaic, e.g. `mosaic.nc`.
    pub fn mosaic_file(&self) -> String {
        format!("{}.nc", self.mosaic_name)
    }

    /// Checks required inputs before any file is opened.
    pub fn validate(&self) -> Result<(), MosaicError> {
        if self.input_mosaic.as_os_str().is_empty() {
            return Err(MosaicError::Config("input_mosaic is not specified".to_string()));
        }
        if let Some(topog) = &self.ocean_topog {
            if topog.as_os_str().is_empty() {
                return Err(MosaicError::Config("ocean_topog is empty".to_string()));
            }
        }
        if self.mosaic_name.is_empty() {
            return Err(MosaicError::Config("mosaic_name is empty".to_string()));
        }
        if !self.sea_level.is_finite() {
            return Err(MosaicError::Config(format!(
                "sea_level must be finite, got {}",
                self.sea_level
            )));
        }
        Ok(())
    }
}
