//! Minimal tensor value held by the tensor store and the weight map.
//!
//! The resolver never computes with tensors. It only hands them out by
//! reference and reads their flat contents for data-typed params.

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Float32,
    Int32,
    Bool,
}

/// Flat backing storage, one variant per dtype.
#[derive(Clone, Debug, PartialEq)]
pub enum TensorData {
    Float32(Vec<f32>),
    Int32(Vec<i32>),
    Bool(Vec<bool>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::Float32(v) => v.len(),
            TensorData::Int32(v) => v.len(),
            TensorData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            TensorData::Float32(_) => DataType::Float32,
            TensorData::Int32(_) => DataType::Int32,
            TensorData::Bool(_) => DataType::Bool,
        }
    }
}

/// Serialized form: `{"dtype": "int32", "shape": [2], "data": [1, 2]}`.
#[derive(Serialize, Deserialize)]
struct TensorRepr {
    dtype: DataType,
    shape: Vec<usize>,
    data: Vec<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "TensorRepr", into = "TensorRepr")]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Fails if the element count of `shape` does not match the data length.
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self, LibraryError> {
        check_element_count(&shape, data.len()).map_err(LibraryError::InvalidArgument)?;
        Ok(Self { shape, data })
    }

    pub fn scalar(value: f32) -> Self {
        Self {
            shape: vec![],
            data: TensorData::Float32(vec![value]),
        }
    }

    pub fn vector(values: Vec<f32>) -> Self {
        Self {
            shape: vec![values.len()],
            data: TensorData::Float32(values),
        }
    }

    pub fn int_vector(values: Vec<i32>) -> Self {
        Self {
            shape: vec![values.len()],
            data: TensorData::Int32(values),
        }
    }

    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Read the whole tensor as a flat sequence of numbers.
    ///
    /// Booleans read as `0.0`/`1.0`.
    pub fn data_sync(&self) -> Vec<f64> {
        match &self.data {
            TensorData::Float32(v) => v.iter().map(|&x| x as f64).collect(),
            TensorData::Int32(v) => v.iter().map(|&x| x as f64).collect(),
            TensorData::Bool(v) => v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
        }
    }
}

fn check_element_count(shape: &[usize], len: usize) -> Result<(), String> {
    let expected: usize = shape.iter().product();
    if expected != len {
        return Err(format!(
            "shape {:?} expects {} elements, got {}",
            shape, expected, len
        ));
    }
    Ok(())
}

/// Int32 elements must be whole numbers inside the `i32` range.
fn to_i32(x: f64) -> Result<i32, String> {
    if x.fract() != 0.0 || x < i32::MIN as f64 || x > i32::MAX as f64 {
        return Err(format!("{} is not a valid int32 element", x));
    }
    Ok(x as i32)
}

impl TryFrom<TensorRepr> for Tensor {
    type Error = String;

    fn try_from(repr: TensorRepr) -> Result<Self, Self::Error> {
        check_element_count(&repr.shape, repr.data.len())?;
        let data = match repr.dtype {
            DataType::Float32 => TensorData::Float32(repr.data.iter().map(|&x| x as f32).collect()),
            DataType::Int32 => {
                TensorData::Int32(repr.data.iter().map(|&x| to_i32(x)).collect::<Result<_, _>>()?)
            }
            DataType::Bool => TensorData::Bool(repr.data.iter().map(|&x| x != 0.0).collect()),
        };
        Ok(Tensor {
            shape: repr.shape,
            data,
        })
    }
}

impl From<Tensor> for TensorRepr {
    fn from(tensor: Tensor) -> Self {
        TensorRepr {
            dtype: tensor.dtype(),
            data: tensor.data_sync(),
            shape: tensor.shape,
        }
    }
}
