//! Dataset I/O module.
//!
//! Grid, mosaic, topography and exchange-grid files are all handled as
//! netCDF-shaped [`Dataset`]s moved through a [`DatasetStore`].

mod dataset;
mod error;
mod netcdf_store;
mod store;

pub use dataset::{Attribute, Dataset, Dimension, VarData, Variable, STRING_LEN};
pub use error::DatasetError;
pub use netcdf_store::NetcdfStore;
pub use store::{DatasetStore, MemoryStore};
