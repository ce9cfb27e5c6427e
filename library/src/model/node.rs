use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::param::ParamDescriptor;

/// One operation instance in a model graph.
///
/// `inputs` hold references of the form `node_name[:output_index]`.
/// Nodes are immutable once parsed; resolution never edits them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, ParamDescriptor>,
}

impl Node {
    pub fn new(name: &str, op: &str) -> Self {
        Self {
            name: name.to_string(),
            op: op.to_string(),
            inputs: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_param(mut self, name: &str, descriptor: ParamDescriptor) -> Self {
        self.params.insert(name.to_string(), descriptor);
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.get(name)
    }

    /// Param names in an order that is safe for threading inputs: literals
    /// first, then by descending input index.
    ///
    /// A `tensors` param at a non-zero index consumes every input from its
    /// index onward, so anything reading a higher index must run before it.
    pub fn param_names_in_input_order(&self) -> Vec<&str> {
        let mut names: Vec<(&str, Option<usize>)> = self
            .params
            .iter()
            .map(|(name, desc)| (name.as_str(), desc.input_index()))
            .collect();
        names.sort_by_key(|(_, index)| index.map(Reverse));
        names.into_iter().map(|(name, _)| name).collect()
    }
}
