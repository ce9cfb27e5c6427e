//! Live tensor table: node outputs keyed by scope-qualified node name.

use std::collections::HashMap;
use std::sync::Arc;

use super::key::{ScopeId, ScopedKey};
use crate::model::tensor::Tensor;

/// Outputs of every node executed so far, per scope.
///
/// Filled by the executor; resolution only reads it.
#[derive(Clone, Debug, Default)]
pub struct TensorStore {
    entries: HashMap<ScopedKey, Vec<Arc<Tensor>>>,
}

impl TensorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node's outputs, replacing any earlier entry for the same key.
    pub fn insert(&mut self, key: ScopedKey, outputs: Vec<Arc<Tensor>>) {
        self.entries.insert(key, outputs);
    }

    pub fn insert_unscoped(&mut self, node: &str, outputs: Vec<Arc<Tensor>>) {
        self.insert(ScopedKey::unscoped(node), outputs);
    }

    pub fn insert_scoped(&mut self, node: &str, scope: &ScopeId, outputs: Vec<Arc<Tensor>>) {
        self.insert(ScopedKey::scoped(node, scope), outputs);
    }

    pub fn get(&self, key: &ScopedKey) -> Option<&[Arc<Tensor>]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &ScopedKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
