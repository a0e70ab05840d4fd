//! In-memory dataset model shaped like a classic netCDF file.
//!
//! Variables are stored row-major over their named dimensions. Character
//! variables hold raw bytes padded with NULs to their last dimension.

use serde::{Deserialize, Serialize};

use super::error::DatasetError;

/// Length of the fixed `string` dimension used for names in grid files.
pub const STRING_LEN: usize = 255;

/// A named dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// A text attribute on a dataset or variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Typed variable payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarData {
    Double(Vec<f64>),
    Int(Vec<i32>),
    Char(Vec<u8>),
}

impl VarData {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            VarData::Double(v) => v.len(),
            VarData::Int(v) => v.len(),
            VarData::Char(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            VarData::Double(_) => "double",
            VarData::Int(_) => "int",
            VarData::Char(_) => "char",
        }
    }
}

/// A variable with its dimensions, data and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dims: Vec<String>,
    pub data: VarData,
    pub attributes: Vec<Attribute>,
}

impl Variable {
    pub fn new(name: impl Into<String>, dims: &[&str], data: VarData) -> Self {
        Self {
            name: name.into(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            attributes: Vec::new(),
        }
    }

    /// Adds a text attribute, builder style.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Returns the value of a text attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// A complete dataset: dimensions, variables and global attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
    pub attributes: Vec<Attribute>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a dimension.
    pub fn add_dimension(&mut self, name: &str, len: usize) -> Result<&mut Self, DatasetError> {
        if self.dim_len(name).is_some() {
            return Err(DatasetError::DuplicateDimension(name.to_string()));
        }
        self.dimensions.push(Dimension {
            name: name.to_string(),
            len,
        });
        Ok(self)
    }

    /// Sets a global text attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: &str) -> &mut Self {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
        self
    }

    /// Returns the value of a global text attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the length of a dimension, or `None` if undefined.
    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().find(|d| d.name == name).map(|d| d.len)
    }

    /// Returns the length of a dimension or a `MissingDimension` error.
    pub fn require_dim(&self, name: &str) -> Result<usize, DatasetError> {
        self.dim_len(name)
            .ok_or_else(|| DatasetError::MissingDimension(name.to_string()))
    }

    /// Adds a variable after checking its dimensions and data length.
    pub fn add_variable(&mut self, var: Variable) -> Result<&mut Self, DatasetError> {
        let mut expected = 1;
        for dim in &var.dims {
            expected *= self
                .dim_len(dim)
                .ok_or_else(|| DatasetError::UnknownDimension(var.name.clone(), dim.clone()))?;
        }
        if var.data.len() != expected {
            return Err(DatasetError::ShapeMismatch {
                name: var.name.clone(),
                expected,
                found: var.data.len(),
            });
        }
        self.variables.retain(|v| v.name != var.name);
        self.variables.push(var);
        Ok(self)
    }

    /// Adds a 1-D character variable holding `value`, NUL-padded to `dim`.
    pub fn add_string(
        &mut self,
        name: &str,
        dim: &str,
        value: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, DatasetError> {
        let width = self.require_dim(dim)?;
        let bytes = padded_bytes(name, value, width)?;
        let mut var = Variable::new(name, &[dim], VarData::Char(bytes));
        for (k, v) in attrs {
            var = var.with_attr(k, v);
        }
        self.add_variable(var)
    }

    /// Adds a 2-D character variable with one NUL-padded row per value.
    pub fn add_string_array(
        &mut self,
        name: &str,
        dims: [&str; 2],
        values: &[String],
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, DatasetError> {
        let width = self.require_dim(dims[1])?;
        let mut bytes = Vec::with_capacity(values.len() * width);
        for value in values {
            bytes.extend(padded_bytes(name, value, width)?);
        }
        let mut var = Variable::new(name, &dims, VarData::Char(bytes));
        for (k, v) in attrs {
            var = var.with_attr(k, v);
        }
        self.add_variable(var)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
    }

    /// Returns a variable by name.
    pub fn variable(&self, name: &str) -> Result<&Variable, DatasetError> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| DatasetError::MissingVariable(name.to_string()))
    }

    /// Returns the values of a double variable.
    pub fn f64_values(&self, name: &str) -> Result<&[f64], DatasetError> {
        match &self.variable(name)?.data {
            VarData::Double(v) => Ok(v),
            other => Err(type_mismatch(name, "double", other)),
        }
    }

    /// Returns the values of an int variable.
    pub fn i32_values(&self, name: &str) -> Result<&[i32], DatasetError> {
        match &self.variable(name)?.data {
            VarData::Int(v) => Ok(v),
            other => Err(type_mismatch(name, "int", other)),
        }
    }

    /// Reads a 1-D character variable as a string, dropping NUL/space padding.
    pub fn string_value(&self, name: &str) -> Result<String, DatasetError> {
        match &self.variable(name)?.data {
            VarData::Char(bytes) => Ok(trim_padding(bytes)),
            other => Err(type_mismatch(name, "char", other)),
        }
    }

    /// Reads a 2-D character variable as one string per row.
    pub fn string_values(&self, name: &str) -> Result<Vec<String>, DatasetError> {
        let var = self.variable(name)?;
        let bytes = match &var.data {
            VarData::Char(bytes) => bytes,
            other => return Err(type_mismatch(name, "char", other)),
        };
        let width = match var.dims.last() {
            Some(dim) => self.require_dim(dim)?,
            None => return Ok(vec![trim_padding(bytes)]),
        };
        if width == 0 {
            return Ok(Vec::new());
        }
        Ok(bytes.chunks(width).map(trim_padding).collect())
    }
}

fn type_mismatch(name: &str, expected: &'static str, found: &VarData) -> DatasetError {
    DatasetError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn padded_bytes(name: &str, value: &str, width: usize) -> Result<Vec<u8>, DatasetError> {
    let mut bytes = value.as_bytes().to_vec();
    if bytes.len() > width {
        return Err(DatasetError::StringTooLong {
            name: name.to_string(),
            len: bytes.len(),
            width,
        });
    }
    bytes.resize(width, 0);
    Ok(bytes)
}

fn trim_padding(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
