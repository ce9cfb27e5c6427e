//! JSON graph fixtures: nodes plus a snapshot of executor state.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::error::LibraryError;
use crate::model::node::Node;
use crate::model::tensor::Tensor;
use crate::runtime::context::{ExecutionContext, WeightMap};
use crate::runtime::key::{ScopeId, ScopedKey};
use crate::runtime::store::TensorStore;

#[derive(Deserialize, Debug)]
pub struct StoreEntry {
    pub node: String,
    #[serde(default)]
    pub scope: Option<ScopeId>,
    pub tensors: Vec<Tensor>,
}

/// A frame to enter, advanced `iterations` times.
#[derive(Deserialize, Debug)]
pub struct FrameSpec {
    pub name: String,
    #[serde(default)]
    pub iterations: u64,
}

#[derive(Deserialize, Debug)]
pub struct GraphFixture {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub store: Vec<StoreEntry>,
    #[serde(default)]
    pub weights: HashMap<String, Vec<Tensor>>,
    #[serde(default)]
    pub frames: Vec<FrameSpec>,
}

/// Fixture turned into live resolver inputs.
pub struct LoadedGraph {
    pub nodes: Vec<Node>,
    pub store: TensorStore,
    pub context: ExecutionContext,
}

impl GraphFixture {
    pub fn parse(json_str: &str) -> Result<Self, LibraryError> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn into_graph(self) -> LoadedGraph {
        let mut store = TensorStore::new();
        for entry in self.store {
            let key = match &entry.scope {
                Some(scope) => ScopedKey::scoped(&entry.node, scope),
                None => ScopedKey::unscoped(&entry.node),
            };
            store.insert(key, entry.tensors.into_iter().map(Arc::new).collect());
        }

        let weights: WeightMap = self
            .weights
            .into_iter()
            .map(|(name, tensors)| (name, tensors.into_iter().map(Arc::new).collect()))
            .collect();

        let mut context = ExecutionContext::new(weights);
        for frame in &self.frames {
            context.enter_frame(&frame.name);
            for _ in 0..frame.iterations {
                context.next_iteration();
            }
        }

        debug!(
            "loaded {} nodes, {} store entries, {} weights",
            self.nodes.len(),
            store.len(),
            context.weights().len()
        );

        LoadedGraph {
            nodes: self.nodes,
            store,
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::context::ScopeContext;

    const FIXTURE: &str = r#"{
        "nodes": [
            {"name": "add", "op": "Add", "inputs": ["x", "w"],
             "params": {"a": {"type": "tensor", "inputIndex": 0}}}
        ],
        "store": [
            {"node": "x", "scope": "/while-1", "tensors": [{"dtype": "float32", "shape": [], "data": [1]}]}
        ],
        "weights": {"w": [{"dtype": "float32", "shape": [2], "data": [1, 2]}]},
        "frames": [{"name": "while", "iterations": 1}]
    }"#;

    #[test]
    fn test_fixture_builds_scoped_state() {
        let graph = GraphFixture::parse(FIXTURE).unwrap().into_graph();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(
            graph.context.current_scope().map(ScopeId::as_str),
            Some("/while-1")
        );
        let key = ScopedKey::scoped("x", &ScopeId::new("/while-1"));
        assert!(graph.store.contains(&key));
        assert_eq!(graph.context.weight("w").map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_fixture_rejects_malformed_param() {
        let json = r#"{"nodes": [{"name": "n", "params": {"p": {"type": "tensors", "inputParamLength": 2}}}]}"#;
        let err = GraphFixture::parse(json).unwrap_err();
        assert!(err.to_string().contains("inputParamLength"));
    }
}
