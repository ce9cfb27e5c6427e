//! Input-name parsing and scope-qualified store keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::ScopeContext;

/// Separator between a node name and its output slot in an input reference.
pub const OUTPUT_SEPARATOR: char = ':';

/// Separator used only when rendering a `ScopedKey` in flattened form.
pub const SCOPE_SEPARATOR: char = '-';

/// Identifies one entry into a (possibly nested) control-flow frame.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tensor store key: node name plus the scope it was produced in.
///
/// Weights and anything produced outside control flow are unscoped.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopedKey {
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeId>,
}

impl ScopedKey {
    pub fn unscoped(node: &str) -> Self {
        Self {
            node: node.to_string(),
            scope: None,
        }
    }

    /// An empty scope id counts as no scope.
    pub fn scoped(node: &str, scope: &ScopeId) -> Self {
        Self {
            node: node.to_string(),
            scope: (!scope.is_empty()).then(|| scope.clone()),
        }
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}

impl fmt::Display for ScopedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}{}{}", self.node, SCOPE_SEPARATOR, scope),
            None => f.write_str(&self.node),
        }
    }
}

/// A parsed input reference: which node's outputs, and which slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorRef {
    pub key: ScopedKey,
    /// `None` when the suffix after `:` is not an output index. Such a
    /// reference never resolves.
    pub output: Option<usize>,
}

/// Split `node_name[:output_index]` and qualify the node name with the
/// context's current scope.
///
/// The split happens at the last `:`. A missing suffix means output 0, as
/// does an empty one (`"Add:"`).
pub fn parse_node_name_and_index(input_name: &str, context: Option<&dyn ScopeContext>) -> TensorRef {
    let (node, output) = match input_name.rfind(OUTPUT_SEPARATOR) {
        None => (input_name, Some(0)),
        Some(pos) => {
            let suffix = &input_name[pos + OUTPUT_SEPARATOR.len_utf8()..];
            let output = if suffix.is_empty() {
                Some(0)
            } else {
                suffix.parse::<usize>().ok()
            };
            (&input_name[..pos], output)
        }
    };

    let key = match context.and_then(|ctx| ctx.current_scope()) {
        Some(scope) => ScopedKey::scoped(node, scope),
        None => ScopedKey::unscoped(node),
    };

    TensorRef { key, output }
}
