pub mod config;
pub mod error;
pub mod evaluation;
pub mod loader;
pub mod model;
pub mod runtime;

use std::path::Path;

use log::{info, warn};
use serde_json::{Map, Value};

pub use error::LibraryError;
pub use evaluation::{ParamResolver, ParamValue, resolve_param, resolve_tensor};
pub use runtime::{ExecutionContext, ScopeContext, TensorStore, parse_node_name_and_index};

use crate::config::{ResolverConfig, load_config};
use crate::loader::{GraphFixture, LoadedGraph};

/// Resolve every param of every node and summarise the results as JSON.
///
/// Output shape: `{node_name: {param_name: value_or_null}}`. With `strict`,
/// the first param that resolves to nothing aborts with `Unresolved`.
pub fn resolve_report(graph: &LoadedGraph, strict: bool) -> Result<Value, LibraryError> {
    let mut report = Map::new();
    for node in &graph.nodes {
        let resolver = ParamResolver::new(node, &graph.store, Some(&graph.context));
        let mut params = Map::new();
        for (name, value) in resolver.resolve_all() {
            let summary = match value {
                Some(value) => value.to_summary(),
                None if strict => {
                    return Err(LibraryError::unresolved(format!(
                        "param '{}' of node '{}' ({})",
                        name, node.name, node.op
                    )));
                }
                None => {
                    warn!("param '{}' of node '{}' did not resolve", name, node.name);
                    Value::Null
                }
            };
            params.insert(name.to_string(), summary);
        }
        report.insert(node.name.clone(), Value::Object(params));
    }
    Ok(Value::Object(report))
}

/// Command-line entry: `graph-params <fixture.json> [config.toml]`.
pub fn run(args: Vec<String>) -> Result<(), LibraryError> {
    let fixture_path = args.get(1).ok_or_else(|| {
        LibraryError::InvalidArgument("usage: graph-params <fixture.json> [config.toml]".to_string())
    })?;
    let config: ResolverConfig = load_config(args.get(2).map(Path::new))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .try_init()
        .ok();

    let graph = GraphFixture::load(Path::new(fixture_path))?.into_graph();
    info!(
        "resolving {} nodes from {} (strict: {})",
        graph.nodes.len(),
        fixture_path,
        config.strict
    );

    let report = resolve_report(&graph, config.strict)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
