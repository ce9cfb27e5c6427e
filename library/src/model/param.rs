//! Declarative parameter descriptors attached to graph nodes.

use serde::{Deserialize, Serialize};

use super::value::AttrValue;
use crate::error::LibraryError;

/// Declared type of a node parameter.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    String,
    Bool,
    Shape,
    Dtype,
    Tensor,
    Tensors,
    #[serde(rename = "number[]")]
    NumberArray,
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "bool[]")]
    BoolArray,
    #[serde(rename = "shape[]")]
    ShapeArray,
}

impl ParamType {
    /// Only `number` reads back a single element from tensor data.
    pub fn is_scalar_numeric(self) -> bool {
        matches!(self, ParamType::Number)
    }
}

/// How a parameter obtains its value.
///
/// Each variant carries only what its resolution needs. Descriptors without an
/// input index are literals regardless of their declared type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawParamDescriptor", into = "RawParamDescriptor")]
pub enum ParamDescriptor {
    Literal {
        param_type: ParamType,
        value: Option<AttrValue>,
    },
    /// One tensor from `inputs[input_index]`.
    Tensor { input_index: usize },
    /// A variadic run of input tensors.
    ///
    /// At index 0 the run stops before the last `input_param_length` inputs,
    /// which belong to params declared after it. At any other index the run
    /// takes every remaining input.
    Tensors {
        input_index: usize,
        input_param_length: Option<usize>,
    },
    /// Numeric data read out of the tensor at `inputs[input_index]`.
    Data {
        param_type: ParamType,
        input_index: usize,
    },
}

impl ParamDescriptor {
    pub fn literal(param_type: ParamType, value: impl Into<AttrValue>) -> Self {
        ParamDescriptor::Literal {
            param_type,
            value: Some(value.into()),
        }
    }

    pub fn tensor(input_index: usize) -> Self {
        ParamDescriptor::Tensor { input_index }
    }

    pub fn tensors(input_index: usize, input_param_length: Option<usize>) -> Self {
        ParamDescriptor::Tensors {
            input_index,
            input_param_length,
        }
    }

    pub fn data(param_type: ParamType, input_index: usize) -> Self {
        ParamDescriptor::Data {
            param_type,
            input_index,
        }
    }

    pub fn param_type(&self) -> ParamType {
        match self {
            ParamDescriptor::Literal { param_type, .. } => *param_type,
            ParamDescriptor::Tensor { .. } => ParamType::Tensor,
            ParamDescriptor::Tensors { .. } => ParamType::Tensors,
            ParamDescriptor::Data { param_type, .. } => *param_type,
        }
    }

    pub fn input_index(&self) -> Option<usize> {
        match self {
            ParamDescriptor::Literal { .. } => None,
            ParamDescriptor::Tensor { input_index }
            | ParamDescriptor::Tensors { input_index, .. }
            | ParamDescriptor::Data { input_index, .. } => Some(*input_index),
        }
    }
}

/// Wire form as emitted by graph converters.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParamDescriptor {
    #[serde(rename = "type")]
    param_type: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_param_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<AttrValue>,
}

impl TryFrom<RawParamDescriptor> for ParamDescriptor {
    type Error = LibraryError;

    fn try_from(raw: RawParamDescriptor) -> Result<Self, Self::Error> {
        let Some(input_index) = raw.input_index else {
            if raw.input_param_length.is_some() {
                return Err(LibraryError::invalid_param(
                    "inputParamLength given without inputIndex",
                ));
            }
            return Ok(ParamDescriptor::Literal {
                param_type: raw.param_type,
                value: raw.value,
            });
        };

        if raw.input_param_length.is_some() && raw.param_type != ParamType::Tensors {
            return Err(LibraryError::invalid_param(format!(
                "inputParamLength is only valid for tensors params, got {:?}",
                raw.param_type
            )));
        }

        Ok(match raw.param_type {
            ParamType::Tensor => ParamDescriptor::Tensor { input_index },
            ParamType::Tensors => ParamDescriptor::Tensors {
                input_index,
                input_param_length: raw.input_param_length,
            },
            param_type => ParamDescriptor::Data {
                param_type,
                input_index,
            },
        })
    }
}

impl From<ParamDescriptor> for RawParamDescriptor {
    fn from(desc: ParamDescriptor) -> Self {
        let param_type = desc.param_type();
        let input_index = desc.input_index();
        match desc {
            ParamDescriptor::Literal { value, .. } => RawParamDescriptor {
                param_type,
                input_index,
                input_param_length: None,
                value,
            },
            ParamDescriptor::Tensors {
                input_param_length,
                ..
            } => RawParamDescriptor {
                param_type,
                input_index,
                input_param_length,
                value: None,
            },
            ParamDescriptor::Tensor { .. } | ParamDescriptor::Data { .. } => RawParamDescriptor {
                param_type,
                input_index,
                input_param_length: None,
                value: None,
            },
        }
    }
}
