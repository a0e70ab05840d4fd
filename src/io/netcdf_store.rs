//! netCDF file backend.
//!
//! Requires the `netcdf` feature and a system NetCDF library. Without the
//! feature, `NetcdfStore::new` reports that the backend is unavailable.

use std::path::Path;

use super::dataset::Dataset;
use super::error::DatasetError;
use super::store::{normalize, DatasetStore};

/// Resolves both paths on disk and compares them, so `.` and the absolute
/// current directory match. Paths that cannot be resolved compare lexically.
pub(crate) fn same_fs_location(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| {
        if p.as_os_str().is_empty() {
            std::fs::canonicalize(".")
        } else {
            std::fs::canonicalize(p)
        }
    };
    match (resolve(a), resolve(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => normalize(a) == normalize(b),
    }
}

/// Reads and writes datasets as `.nc` files on disk.
#[derive(Debug)]
pub struct NetcdfStore {
    _private: (),
}

#[cfg(feature = "netcdf")]
impl NetcdfStore {
    pub fn new() -> Result<Self, DatasetError> {
        Ok(Self { _private: () })
    }
}

#[cfg(not(feature = "netcdf"))]
impl NetcdfStore {
    pub fn new() -> Result<Self, DatasetError> {
        Err(DatasetError::NotAvailable)
    }
}

#[cfg(feature = "netcdf")]
mod backend {
    use super::*;
    use crate::io::dataset::{Attribute, VarData, Variable};
    use netcdf::types::{BasicType, VariableType};

    fn text_attr(value: netcdf::AttrValue) -> Option<String> {
        match value {
            netcdf::AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub(super) fn read(path: &Path) -> Result<Dataset, DatasetError> {
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }
        let file = netcdf::open(path)?;
        let mut ds = Dataset::new();

        for dim in file.dimensions() {
            ds.add_dimension(&dim.name(), dim.len())?;
        }
        for attr in file.attributes() {
            if let Some(value) = attr.value().ok().and_then(text_attr) {
                ds.set_attr(&attr.name(), &value);
            }
        }

        for var in file.variables() {
            let name = var.name().to_string();
            let dims: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
            let data = match var.vartype() {
                VariableType::Basic(BasicType::Double) | VariableType::Basic(BasicType::Float) => {
                    VarData::Double(var.values::<f64, _>(..)?)
                }
                VariableType::Basic(BasicType::Int)
                | VariableType::Basic(BasicType::Short)
                | VariableType::Basic(BasicType::Byte) => VarData::Int(var.values::<i32, _>(..)?),
                VariableType::Basic(BasicType::Char) => VarData::Char(var.raw_values(..)?),
                _ => return Err(DatasetError::UnsupportedType(name)),
            };
            let attributes = var
                .attributes()
                .filter_map(|a| {
                    let value = a.value().ok().and_then(text_attr)?;
                    Some(Attribute {
                        name: a.name().to_string(),
                        value,
                    })
                })
                .collect();
            ds.add_variable(Variable {
                name,
                dims,
                data,
                attributes,
            })?;
        }

        Ok(ds)
    }

    pub(super) fn write(path: &Path, dataset: &Dataset) -> Result<(), DatasetError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = netcdf::create(path)?;

        for dim in &dataset.dimensions {
            file.add_dimension(&dim.name, dim.len)?;
        }
        for attr in &dataset.attributes {
            file.add_attribute(&attr.name, attr.value.as_str())?;
        }

        for var in &dataset.variables {
            let dims: Vec<&str> = var.dims.iter().map(|d| d.as_str()).collect();
            let mut nc_var = match &var.data {
                VarData::Double(values) => {
                    let mut v = file.add_variable::<f64>(&var.name, &dims)?;
                    if !values.is_empty() {
                        v.put_values(values, ..)?;
                    }
                    v
                }
                VarData::Int(values) => {
                    let mut v = file.add_variable::<i32>(&var.name, &dims)?;
                    if !values.is_empty() {
                        v.put_values(values, ..)?;
                    }
                    v
                }
                VarData::Char(bytes) => {
                    let mut v = file.add_variable_with_type(
                        &var.name,
                        &dims,
                        &VariableType::Basic(BasicType::Char),
                    )?;
                    if !bytes.is_empty() {
                        v.put_raw_values(bytes, ..)?;
                    }
                    v
                }
            };
            for attr in &var.attributes {
                nc_var.add_attribute(&attr.name, attr.value.as_str())?;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "netcdf")]
impl DatasetStore for NetcdfStore {
    fn read(&self, path: &Path) -> Result<Dataset, DatasetError> {
        backend::read(path)
    }

    fn write(&mut self, path: &Path, dataset: &Dataset) -> Result<(), DatasetError> {
        backend::write(path, dataset)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn same_location(&self, a: &Path, b: &Path) -> bool {
        same_fs_location(a, b)
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), DatasetError> {
        if !from.is_file() {
            return Err(DatasetError::NotFound(from.to_path_buf()));
        }
        // Copying a file onto itself would truncate it.
        if same_fs_location(from, to) {
            return Ok(());
        }
        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::copy(from, to)?;
        Ok(())
    }
}

#[cfg(not(feature = "netcdf"))]
impl DatasetStore for NetcdfStore {
    fn read(&self, _path: &Path) -> Result<Dataset, DatasetError> {
        Err(DatasetError::NotAvailable)
    }

    fn write(&mut self, _path: &Path, _dataset: &Dataset) -> Result<(), DatasetError> {
        Err(DatasetError::NotAvailable)
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn same_location(&self, a: &Path, b: &Path) -> bool {
        same_fs_location(a, b)
    }
}
