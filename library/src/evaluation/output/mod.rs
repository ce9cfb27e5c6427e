//! Typed values produced by param resolution.

mod param_value;

pub use param_value::ParamValue;
