//! Per-node param resolution with input threading.

use super::output::ParamValue;
use super::resolve::resolve_param;
use crate::error::LibraryError;
use crate::model::node::Node;
use crate::runtime::context::ScopeContext;
use crate::runtime::store::TensorStore;

/// Resolves the params of one node in sequence.
///
/// Holds the node's current input list so a variadic `tensors` param that
/// consumes trailing inputs hides them from params resolved afterwards. The
/// node itself is shared and stays untouched; each executor invocation makes
/// its own resolver.
pub struct ParamResolver<'a> {
    node: &'a Node,
    inputs: &'a [String],
    store: &'a TensorStore,
    context: Option<&'a dyn ScopeContext>,
}

impl<'a> ParamResolver<'a> {
    pub fn new(
        node: &'a Node,
        store: &'a TensorStore,
        context: Option<&'a dyn ScopeContext>,
    ) -> Self {
        Self {
            node,
            inputs: &node.inputs,
            store,
            context,
        }
    }

    /// Input names not yet consumed by a variadic param.
    pub fn remaining_inputs(&self) -> &'a [String] {
        self.inputs
    }

    pub fn resolve(&mut self, param_name: &str) -> Option<ParamValue> {
        let resolution = resolve_param(param_name, self.node, self.inputs, self.store, self.context);
        self.inputs = resolution.remaining_inputs;
        resolution.value
    }

    /// Like [`resolve`](Self::resolve) but treats an absent value as an error.
    pub fn require(&mut self, param_name: &str) -> Result<ParamValue, LibraryError> {
        self.resolve(param_name).ok_or_else(|| {
            LibraryError::unresolved(format!(
                "param '{}' of node '{}' ({})",
                param_name, self.node.name, self.node.op
            ))
        })
    }

    pub fn number(&mut self, param_name: &str, default: f64) -> f64 {
        self.resolve(param_name)
            .map_or(default, |value| value.as_number(default))
    }

    /// Resolve every declared param, literals first and then by descending
    /// input index.
    pub fn resolve_all(mut self) -> Vec<(&'a str, Option<ParamValue>)> {
        self.node
            .param_names_in_input_order()
            .into_iter()
            .map(|name| (name, self.resolve(name)))
            .collect()
    }
}
