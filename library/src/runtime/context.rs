//! Execution context: current scope id and weight lookup.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use super::key::ScopeId;
use crate::model::tensor::Tensor;

/// What the resolver needs from the executor's context.
pub trait ScopeContext {
    /// Scope that runtime tensors are currently being produced in.
    fn current_scope(&self) -> Option<&ScopeId>;

    /// Constant/weight outputs by unqualified node name.
    fn weight(&self, name: &str) -> Option<&[Arc<Tensor>]>;
}

pub type WeightMap = HashMap<String, Vec<Arc<Tensor>>>;

/// One level of the frame stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    pub id: u64,
    pub name: String,
    pub iteration: u64,
}

impl FrameInfo {
    fn is_root(&self) -> bool {
        self.id == 0 && self.iteration == 0
    }

    fn segment(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            format!("{}-{}", self.name, self.iteration)
        }
    }
}

/// Context for one graph execution.
///
/// Tracks the control-flow frame stack so every loop iteration gets its own
/// scope id. The stack always keeps the root frame, which renders as the
/// empty id, so code outside any frame is unscoped.
pub struct ExecutionContext {
    weights: WeightMap,
    frames: Vec<FrameInfo>,
    last_id: u64,
    current_scope: Option<ScopeId>,
}

impl ExecutionContext {
    pub fn new(weights: WeightMap) -> Self {
        let mut ctx = Self {
            weights,
            frames: vec![FrameInfo {
                id: 0,
                name: String::new(),
                iteration: 0,
            }],
            last_id: 0,
            current_scope: None,
        };
        ctx.refresh_scope();
        ctx
    }

    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    pub fn frames(&self) -> &[FrameInfo] {
        &self.frames
    }

    /// Enter a new frame (e.g. a loop body) at iteration 0.
    pub fn enter_frame(&mut self, name: &str) {
        self.last_id += 1;
        self.frames.push(FrameInfo {
            id: self.last_id,
            name: name.to_string(),
            iteration: 0,
        });
        self.refresh_scope();
        debug!("enter frame '{}', scope {:?}", name, self.current_scope);
    }

    /// Leave the innermost frame. The root frame is never popped.
    pub fn exit_frame(&mut self) {
        if self.frames.len() == 1 {
            warn!("exit_frame called at root frame, ignoring");
            return;
        }
        self.frames.pop();
        self.refresh_scope();
        debug!("exit frame, scope {:?}", self.current_scope);
    }

    /// Advance the innermost frame to its next iteration.
    pub fn next_iteration(&mut self) {
        self.last_id += 1;
        let next_id = self.last_id;
        if let Some(top) = self.frames.last_mut() {
            top.id = next_id;
            top.iteration += 1;
        }
        self.refresh_scope();
        debug!("next iteration, scope {:?}", self.current_scope);
    }

    fn refresh_scope(&mut self) {
        let id = self
            .frames
            .iter()
            .map(FrameInfo::segment)
            .collect::<Vec<_>>()
            .join("/");
        self.current_scope = (!id.is_empty()).then(|| ScopeId::new(id));
    }
}

impl ScopeContext for ExecutionContext {
    fn current_scope(&self) -> Option<&ScopeId> {
        self.current_scope.as_ref()
    }

    fn weight(&self, name: &str) -> Option<&[Arc<Tensor>]> {
        self.weights.get(name).map(Vec::as_slice)
    }
}
