//! ParamValue — the concrete value a param descriptor resolves to.

use std::sync::Arc;

use serde_json::json;

use crate::model::tensor::Tensor;
use crate::model::value::AttrValue;

/// The value produced by resolving one node param.
///
/// The variant follows the descriptor kind: literals stay literals, tensor
/// params yield tensors, data params yield numbers.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Literal carried by the descriptor itself.
    Literal(AttrValue),
    /// Single input tensor.
    Tensor(Arc<Tensor>),
    /// Variadic input tensors. Unresolved inputs keep their slot as `None`.
    Tensors(Vec<Option<Arc<Tensor>>>),
    /// First element of an input tensor (declared `number`).
    Number(f64),
    /// Full flat contents of an input tensor.
    Numbers(Vec<f64>),
}

impl ParamValue {
    /// Extract as scalar, returning default if not numeric.
    pub fn as_number(&self, default: f64) -> f64 {
        match self {
            ParamValue::Number(n) => *n,
            ParamValue::Literal(v) => v.as_f64().unwrap_or(default),
            _ => default,
        }
    }

    /// Extract as a numeric sequence (data params or numeric array literals).
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            ParamValue::Numbers(v) => Some(v.clone()),
            ParamValue::Literal(v) => v.as_f64_array(),
            _ => None,
        }
    }

    pub fn into_tensor(self) -> Option<Arc<Tensor>> {
        match self {
            ParamValue::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn into_tensors(self) -> Vec<Option<Arc<Tensor>>> {
        match self {
            ParamValue::Tensors(ts) => ts,
            ParamValue::Tensor(t) => vec![Some(t)],
            _ => vec![],
        }
    }

    /// JSON summary for reports. Tensors are shown as dtype and shape only.
    pub fn to_summary(&self) -> serde_json::Value {
        fn tensor_summary(t: &Tensor) -> serde_json::Value {
            json!({ "dtype": t.dtype(), "shape": t.shape() })
        }

        match self {
            ParamValue::Literal(v) => serde_json::to_value(v).unwrap_or(serde_json::Value::Null),
            ParamValue::Tensor(t) => tensor_summary(t),
            ParamValue::Tensors(ts) => ts
                .iter()
                .map(|t| t.as_deref().map_or(serde_json::Value::Null, tensor_summary))
                .collect(),
            ParamValue::Number(n) => json!(n),
            ParamValue::Numbers(ns) => json!(ns),
        }
    }
}
