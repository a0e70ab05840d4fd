//! Dataset error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, reading or writing datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Dimension '{0}' does not exist")]
    MissingDimension(String),
    #[error("Dimension '{0}' is already defined")]
    DuplicateDimension(String),
    #[error("Variable '{0}' references undefined dimension '{1}'")]
    UnknownDimension(String, String),
    #[error("Field '{0}' does not exist")]
    MissingVariable(String),
    #[error("Variable '{name}' is {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Variable '{name}' has {found} values, its dimensions require {expected}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Value of '{name}' is {len} bytes, longer than its {width}-character dimension")]
    StringTooLong {
        name: String,
        len: usize,
        width: usize,
    },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Variable '{0}' has an unsupported type")]
    UnsupportedType(String),
    #[error("NetCDF error: {0}")]
    Backend(String),
    #[error("NetCDF support is not available (build with the `netcdf` feature)")]
    NotAvailable,
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for DatasetError {
    fn from(e: netcdf::Error) -> Self {
        DatasetError::Backend(e.to_string())
    }
}
