//! Executor-owned runtime state the resolver reads from.

pub mod context;
pub mod key;
pub mod store;

pub use context::{ExecutionContext, FrameInfo, ScopeContext, WeightMap};
pub use key::{ScopeId, ScopedKey, TensorRef, parse_node_name_and_index};
pub use store::TensorStore;
