//! Param resolution for graph execution.
//!
//! An executor about to run a node asks for each of its params by name. Each
//! descriptor is turned into a concrete value by following the node's input
//! references into the tensor store, qualified by the execution context's
//! current scope so loop iterations see their own tensors.

pub mod output;
pub mod resolve;
pub mod resolver;

pub use output::ParamValue;
pub use resolve::{Resolution, resolve_param, resolve_tensor};
pub use resolver::ParamResolver;
