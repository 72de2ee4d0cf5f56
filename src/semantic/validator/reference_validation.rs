//! Catalog reference validation: active graph resolution and role checks.

use log::debug;

use crate::ast::Statement;
use crate::diag::Diagnostic;
use crate::semantic::catalog::{Access, Catalog, CatalogError, Graph, has_permission};
use crate::semantic::context::{Cancelled, ExecutionContext};
use crate::semantic::diag::SemanticDiagBuilder;

/// Resolves the graph a script starts on.
///
/// The requested graph is tried first, then the catalog default. Lookup
/// failures other than cancellation leave the script without an active graph.
pub(super) fn resolve_initial_graph(
    catalog: &dyn Catalog,
    ctx: &ExecutionContext,
    requested: &str,
) -> Result<Option<Graph>, Cancelled> {
    if !requested.is_empty() {
        match catalog.lookup_graph(ctx, requested) {
            Ok(graph) => return Ok(Some(graph)),
            Err(CatalogError::Cancelled(cancelled)) => return Err(cancelled),
            Err(err) => debug!("requested default graph {requested:?} unavailable: {err}"),
        }
    }
    match catalog.default_graph(ctx) {
        Ok(graph) => Ok(Some(graph)),
        Err(CatalogError::Cancelled(cancelled)) => Err(cancelled),
        Err(err) => {
            debug!("no initial graph: {err}");
            Ok(None)
        }
    }
}

/// Looks up the target of a `USE` statement.
///
/// Returns `Ok(Err(diagnostic))` when the graph is not registered.
pub(super) fn resolve_use_target(
    catalog: &dyn Catalog,
    ctx: &ExecutionContext,
    statement: &Statement,
    name: &str,
) -> Result<Result<Graph, Diagnostic>, Cancelled> {
    match catalog.lookup_graph(ctx, name) {
        Ok(graph) => Ok(Ok(graph)),
        Err(CatalogError::Cancelled(cancelled)) => Err(cancelled),
        Err(_) => Ok(Err(SemanticDiagBuilder::graph_undefined(name)
            .for_statement(statement)
            .build())),
    }
}

/// Checks that `role` holds `access` on `graph`.
pub(super) fn check_access(
    graph: &Graph,
    role: &str,
    access: Access,
    statement: &Statement,
) -> Option<Diagnostic> {
    if has_permission(graph, role, access) {
        return None;
    }
    let builder = match access {
        Access::Read => SemanticDiagBuilder::read_denied(role, &graph.name),
        Access::Write => SemanticDiagBuilder::write_denied(role, &graph.name),
    };
    Some(builder.for_statement(statement).build())
}
