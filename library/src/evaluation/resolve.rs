//! Param and input-tensor resolution against the live tensor store.
//!
//! Nothing here fails loudly. Any reference that cannot be followed comes
//! back as `None` and the executor decides whether that is fatal.

use std::sync::Arc;

use log::trace;

use super::output::ParamValue;
use crate::model::node::Node;
use crate::model::param::ParamDescriptor;
use crate::model::tensor::Tensor;
use crate::runtime::context::ScopeContext;
use crate::runtime::key::parse_node_name_and_index;
use crate::runtime::store::TensorStore;

/// Result of resolving one param.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<'n> {
    pub value: Option<ParamValue>,
    /// Input names left for params resolved after this one.
    ///
    /// A `tensors` param at a non-zero index consumes every input from its
    /// index onward; all other params leave the inputs as they were.
    pub remaining_inputs: &'n [String],
}

/// Resolve `param_name` of `node` against the given input names.
///
/// `inputs` starts as `node.inputs` and is threaded from one call to the next
/// through `Resolution::remaining_inputs`. The node is never modified.
pub fn resolve_param<'n>(
    param_name: &str,
    node: &Node,
    inputs: &'n [String],
    store: &TensorStore,
    context: Option<&dyn ScopeContext>,
) -> Resolution<'n> {
    let unchanged = |value: Option<ParamValue>| Resolution {
        value,
        remaining_inputs: inputs,
    };

    let Some(descriptor) = node.param(param_name) else {
        trace!("node '{}' has no param '{}'", node.name, param_name);
        return unchanged(None);
    };

    match descriptor {
        ParamDescriptor::Literal { value, .. } => unchanged(value.clone().map(ParamValue::Literal)),
        ParamDescriptor::Tensor { input_index } => unchanged(
            inputs
                .get(*input_index)
                .and_then(|name| resolve_tensor(name, store, context))
                .map(ParamValue::Tensor),
        ),
        ParamDescriptor::Tensors {
            input_index: 0,
            input_param_length,
        } => {
            let end = match input_param_length {
                Some(k) if *k > 0 => inputs.len().saturating_sub(*k),
                _ => inputs.len(),
            };
            unchanged(Some(resolve_all(&inputs[..end], store, context)))
        }
        ParamDescriptor::Tensors { input_index, .. } => {
            let split = (*input_index).min(inputs.len());
            let (remaining, consumed) = inputs.split_at(split);
            Resolution {
                value: Some(resolve_all(consumed, store, context)),
                remaining_inputs: remaining,
            }
        }
        ParamDescriptor::Data {
            param_type,
            input_index,
        } => {
            let data = inputs
                .get(*input_index)
                .and_then(|name| resolve_tensor(name, store, context))
                .map(|tensor| tensor.data_sync());
            let value = match data {
                Some(data) if param_type.is_scalar_numeric() => {
                    data.first().copied().map(ParamValue::Number)
                }
                Some(data) => Some(ParamValue::Numbers(data)),
                None => None,
            };
            unchanged(value)
        }
    }
}

fn resolve_all(
    names: &[String],
    store: &TensorStore,
    context: Option<&dyn ScopeContext>,
) -> ParamValue {
    ParamValue::Tensors(
        names
            .iter()
            .map(|name| resolve_tensor(name, store, context))
            .collect(),
    )
}

/// Resolve one input reference (`node[:index]`) to a tensor.
///
/// A store entry under the scope-qualified name wins. Failing that, the
/// unqualified name is tried as a weight and then as an unscoped store
/// entry. Weights are never scoped, so the fallback ignores the context's
/// scope even when one is set.
pub fn resolve_tensor(
    name: &str,
    store: &TensorStore,
    context: Option<&dyn ScopeContext>,
) -> Option<Arc<Tensor>> {
    let qualified = parse_node_name_and_index(name, context);
    if let Some(outputs) = store.get(&qualified.key) {
        return output_at(outputs, qualified.output, name);
    }

    let plain = parse_node_name_and_index(name, None);
    if let Some(weights) = context.and_then(|ctx| ctx.weight(&plain.key.node)) {
        return output_at(weights, plain.output, name);
    }

    match store.get(&plain.key) {
        Some(outputs) => output_at(outputs, plain.output, name),
        None => {
            trace!("'{}' not found as '{}' or as a weight", name, qualified.key);
            None
        }
    }
}

fn output_at(outputs: &[Arc<Tensor>], index: Option<usize>, name: &str) -> Option<Arc<Tensor>> {
    let tensor = index.and_then(|i| outputs.get(i)).cloned();
    if tensor.is_none() {
        trace!("'{}' has {} outputs, index {:?} out of range", name, outputs.len(), index);
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::param::ParamType;
    use crate::model::value::AttrValue;
    use crate::runtime::context::{ExecutionContext, WeightMap};
    use crate::runtime::key::ScopeId;

    fn tensor(v: f32) -> Arc<Tensor> {
        Arc::new(Tensor::scalar(v))
    }

    struct FixedScope {
        scope: Option<ScopeId>,
        weights: WeightMap,
    }

    impl ScopeContext for FixedScope {
        fn current_scope(&self) -> Option<&ScopeId> {
            self.scope.as_ref()
        }

        fn weight(&self, name: &str) -> Option<&[Arc<Tensor>]> {
            self.weights.get(name).map(Vec::as_slice)
        }
    }

    fn scope(id: &str) -> FixedScope {
        FixedScope {
            scope: Some(ScopeId::new(id)),
            weights: WeightMap::new(),
        }
    }

    #[test]
    fn test_qualified_store_entry_beats_weight() {
        let t1 = tensor(1.0);
        let t2 = tensor(2.0);
        let mut store = TensorStore::new();
        store.insert_scoped("Add", &ScopeId::new("3"), vec![t1.clone()]);
        let mut ctx = scope("3");
        ctx.weights.insert("Add".to_string(), vec![t2]);

        let found = resolve_tensor("Add:0", &store, Some(&ctx)).unwrap();
        assert!(Arc::ptr_eq(&found, &t1));
    }

    #[test]
    fn test_falls_back_to_weight_under_any_scope() {
        let t2 = tensor(2.0);
        let store = TensorStore::new();
        for id in ["1", "while-4", ""] {
            let mut ctx = scope(id);
            ctx.weights.insert("Add".to_string(), vec![t2.clone()]);
            let found = resolve_tensor("Add:0", &store, Some(&ctx)).unwrap();
            assert!(Arc::ptr_eq(&found, &t2));
        }
    }

    #[test]
    fn test_weight_beats_unscoped_store_entry_on_fallback() {
        let weight = tensor(2.0);
        let mut store = TensorStore::new();
        store.insert_unscoped("w", vec![tensor(9.0)]);
        let mut ctx = scope("1");
        ctx.weights.insert("w".to_string(), vec![weight.clone()]);

        let found = resolve_tensor("w", &store, Some(&ctx)).unwrap();
        assert!(Arc::ptr_eq(&found, &weight));
    }

    #[test]
    fn test_weight_with_bad_index_does_not_fall_back() {
        let mut store = TensorStore::new();
        store.insert_unscoped("w", vec![tensor(8.0), tensor(9.0)]);
        let mut ctx = scope("1");
        ctx.weights.insert("w".to_string(), vec![tensor(2.0)]);

        assert!(resolve_tensor("w:1", &store, Some(&ctx)).is_none());
    }

    #[test]
    fn test_falls_back_to_unscoped_store_entry() {
        let outer = tensor(5.0);
        let mut store = TensorStore::new();
        store.insert_unscoped("Const", vec![outer.clone()]);

        let found = resolve_tensor("Const", &store, Some(&scope("7"))).unwrap();
        assert!(Arc::ptr_eq(&found, &outer));
    }

    #[test]
    fn test_qualified_entry_with_bad_index_does_not_fall_back() {
        let mut store = TensorStore::new();
        store.insert_scoped("Add", &ScopeId::new("3"), vec![tensor(1.0)]);
        store.insert_unscoped("Add", vec![tensor(1.0), tensor(2.0)]);

        assert!(resolve_tensor("Add:1", &store, Some(&scope("3"))).is_none());
    }

    #[test]
    fn test_without_context_reads_unscoped_store() {
        let t = tensor(1.0);
        let mut store = TensorStore::new();
        store.insert_unscoped("x", vec![tensor(0.0), t.clone()]);

        assert!(Arc::ptr_eq(&resolve_tensor("x:1", &store, None).unwrap(), &t));
        assert!(resolve_tensor("x:2", &store, None).is_none());
        assert!(resolve_tensor("y", &store, None).is_none());
    }

    #[test]
    fn test_missing_param_is_none() {
        let node = Node::new("n", "Op");
        let store = TensorStore::new();
        let r = resolve_param("alpha", &node, &node.inputs, &store, None);
        assert_eq!(r.value, None);
        assert!(r.remaining_inputs.is_empty());
    }

    #[test]
    fn test_literal_param_is_returned_unchanged() {
        let node = Node::new("n", "Op")
            .with_param("pad", ParamDescriptor::literal(ParamType::String, "same"));
        let store = TensorStore::new();
        let r = resolve_param("pad", &node, &node.inputs, &store, None);
        assert_eq!(r.value, Some(ParamValue::Literal(AttrValue::from("same"))));
    }

    #[test]
    fn test_tensor_param_out_of_range_is_none() {
        let node = Node::new("n", "Op")
            .with_inputs(["a"])
            .with_param("x", ParamDescriptor::tensor(3));
        let mut store = TensorStore::new();
        store.insert_unscoped("a", vec![tensor(1.0)]);
        assert_eq!(resolve_param("x", &node, &node.inputs, &store, None).value, None);
    }

    #[test]
    fn test_tensors_at_zero_excludes_trailing_params() {
        let node = Node::new("concat", "Concat")
            .with_inputs(["a", "b", "axis"])
            .with_param("tensors", ParamDescriptor::tensors(0, Some(1)));
        let mut store = TensorStore::new();
        let (a, b) = (tensor(1.0), tensor(2.0));
        store.insert_unscoped("a", vec![a.clone()]);
        store.insert_unscoped("b", vec![b.clone()]);
        store.insert_unscoped("axis", vec![tensor(0.0)]);

        let r = resolve_param("tensors", &node, &node.inputs, &store, None);
        let tensors = r.value.unwrap().into_tensors();
        assert_eq!(tensors.len(), 2);
        assert!(Arc::ptr_eq(tensors[0].as_ref().unwrap(), &a));
        assert!(Arc::ptr_eq(tensors[1].as_ref().unwrap(), &b));
        assert_eq!(r.remaining_inputs, node.inputs.as_slice());
    }

    #[test]
    fn test_tensors_at_zero_without_length_takes_all() {
        let node = Node::new("n", "AddN")
            .with_inputs(["a", "b"])
            .with_param("tensors", ParamDescriptor::tensors(0, None));
        let store = TensorStore::new();
        let r = resolve_param("tensors", &node, &node.inputs, &store, None);
        assert_eq!(r.value, Some(ParamValue::Tensors(vec![None, None])));
    }

    #[test]
    fn test_tensors_at_zero_with_oversized_length_is_empty() {
        let node = Node::new("n", "Op")
            .with_inputs(["a"])
            .with_param("tensors", ParamDescriptor::tensors(0, Some(4)));
        let store = TensorStore::new();
        let r = resolve_param("tensors", &node, &node.inputs, &store, None);
        assert_eq!(r.value, Some(ParamValue::Tensors(vec![])));
    }

    #[test]
    fn test_tensors_beyond_end_consumes_nothing() {
        let node = Node::new("n", "Op")
            .with_inputs(["a"])
            .with_param("tensors", ParamDescriptor::tensors(5, None));
        let store = TensorStore::new();
        let r = resolve_param("tensors", &node, &node.inputs, &store, None);
        assert_eq!(r.value, Some(ParamValue::Tensors(vec![])));
        assert_eq!(r.remaining_inputs, node.inputs.as_slice());
    }

    #[test]
    fn test_number_takes_first_element_and_array_takes_all() {
        let node = Node::new("n", "Op")
            .with_inputs(["dims"])
            .with_param("axis", ParamDescriptor::data(ParamType::Number, 0))
            .with_param("shape", ParamDescriptor::data(ParamType::NumberArray, 0));
        let mut store = TensorStore::new();
        store.insert_unscoped("dims", vec![Arc::new(Tensor::int_vector(vec![4, 5, 6]))]);

        let axis = resolve_param("axis", &node, &node.inputs, &store, None);
        assert_eq!(axis.value, Some(ParamValue::Number(4.0)));
        let shape = resolve_param("shape", &node, &node.inputs, &store, None);
        assert_eq!(shape.value, Some(ParamValue::Numbers(vec![4.0, 5.0, 6.0])));
    }

    #[test]
    fn test_number_from_empty_tensor_is_none() {
        let node = Node::new("n", "Op")
            .with_inputs(["e"])
            .with_param("axis", ParamDescriptor::data(ParamType::Number, 0));
        let mut store = TensorStore::new();
        store.insert_unscoped("e", vec![Arc::new(Tensor::vector(vec![]))]);
        assert_eq!(resolve_param("axis", &node, &node.inputs, &store, None).value, None);
    }

    #[test]
    fn test_scoped_resolution_through_execution_context() {
        let mut weights = WeightMap::new();
        weights.insert("kernel".to_string(), vec![tensor(3.0)]);
        let mut ctx = ExecutionContext::new(weights);
        ctx.enter_frame("while");
        ctx.next_iteration();

        let mut store = TensorStore::new();
        let scope = ctx.current_scope().cloned().unwrap();
        let iter_value = tensor(1.0);
        store.insert_scoped("body/add", &scope, vec![iter_value.clone()]);

        let found = resolve_tensor("body/add", &store, Some(&ctx)).unwrap();
        assert!(Arc::ptr_eq(&found, &iter_value));
        assert!(resolve_tensor("kernel", &store, Some(&ctx)).is_some());

        ctx.next_iteration();
        assert!(resolve_tensor("body/add", &store, Some(&ctx)).is_none());
    }
}
