//! Semantic validation integration tests.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use common::{codes, expect_diagnostics, parse_cleanly, social_catalog, validate};
use gql_frontend::diag::DiagnosticCode;
use gql_frontend::semantic::{
    Access, Cancelled, Catalog, CatalogError, CatalogResult, ExecutionContext, Graph, GraphRole,
    InMemoryCatalog, Options, ValidateError, Validator, has_permission,
};

fn main_catalog() -> Arc<InMemoryCatalog> {
    let catalog = InMemoryCatalog::new();
    catalog.register_graph(Graph::new("main").with_role(GraphRole::reader("reader")));
    catalog.set_default_graph("main");
    Arc::new(catalog)
}

#[test]
fn reader_cannot_delete() {
    let diags = expect_diagnostics(
        main_catalog(),
        "MATCH (n) RETURN n; DELETE GRAPH main",
        &Options::new().with_role("reader"),
    );
    assert_eq!(codes(&diags), vec!["AUTHORIZATION_DENIED"]);
    assert_eq!(diags[0].statement, "DELETE GRAPH main");
    assert_eq!(
        diags[0].message,
        "role \"reader\" is not authorized to modify graph \"main\""
    );
}

#[test]
fn unknown_variable_named() {
    let diags = expect_diagnostics(social_catalog(), "MATCH (n) RETURN n, m", &Options::new());
    assert_eq!(diags.len(), 1);
    assert!(diags[0].has_code(DiagnosticCode::SemanticUnknownVariable));
    assert!(diags[0].message.ends_with(": m"), "{}", diags[0].message);
}

#[test]
fn use_of_missing_graph_keeps_default_context() {
    let diags = expect_diagnostics(
        social_catalog(),
        "USE GRAPH missing; MATCH (n) RETURN n",
        &Options::new(),
    );
    assert_eq!(codes(&diags), vec!["CATALOG_GRAPH_UNDEFINED"]);
    assert_eq!(diags[0].message, "graph \"missing\" not found");
}

#[test]
fn use_of_missing_graph_without_default() {
    let diags = expect_diagnostics(
        Arc::new(InMemoryCatalog::new()),
        "USE GRAPH missing; MATCH (n) RETURN n",
        &Options::new(),
    );
    assert_eq!(
        codes(&diags),
        vec!["CATALOG_GRAPH_UNDEFINED", "CATALOG_GRAPH_MISSING"]
    );
}

#[test]
fn errors_are_batched_and_sorted() {
    let source = "MATCH (a) RETURN b;\nUSE nowhere;\nINSERT (x);\nMATCH (c) RETURN c, d, e";
    let diags = expect_diagnostics(
        social_catalog(),
        source,
        &Options::new().with_role("reader"),
    );
    assert_eq!(
        codes(&diags),
        vec![
            "SEMANTIC_UNKNOWN_VARIABLE",
            "CATALOG_GRAPH_UNDEFINED",
            "AUTHORIZATION_DENIED",
            "SEMANTIC_UNKNOWN_VARIABLE",
        ]
    );
    let lines: Vec<_> = diags.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4]);
    assert_eq!(
        diags[3].message,
        "RETURN references undefined variables: d, e"
    );
}

#[test]
fn checked_statements_carry_context() {
    let output = validate(
        social_catalog(),
        "USE social; MATCH (p:Person)-[:LIVES_IN]->(c:City) RETURN p.name, c; CREATE (x)",
        &Options::new().with_role("writer"),
    )
    .expect("valid script");
    assert_eq!(output.len(), 3);
    for checked in output.iter() {
        assert_eq!(checked.graph.name, "social");
        assert_eq!(checked.schema, "public");
    }
    assert_eq!(output.statements[1].variables, vec!["p", "c"]);
    assert!(output.statements[2].variables.is_empty());
}

#[test]
fn default_graph_option_is_lenient() {
    // An unknown default graph silently falls back to the catalog default.
    let output = validate(
        social_catalog(),
        "MATCH (n) RETURN n",
        &Options::new().with_default_graph("ghost"),
    )
    .expect("fallback applies");
    assert_eq!(output.statements[0].graph.name, "social");
}

#[test]
fn validation_is_idempotent() {
    let catalog = social_catalog();
    let script = parse_cleanly("USE social; MATCH (n) RETURN x; DROP GRAPH social");
    let validator = Validator::new(catalog);
    let options = Options::new().with_role("reader");
    let ctx = ExecutionContext::new();

    let first = validator.validate(&ctx, &script, &options);
    let second = validator.validate(&ctx, &script, &options);
    assert!(first.is_err());
    assert_eq!(first, second);
}

#[test]
fn empty_role_always_authorized() {
    let graph = Graph::new("locked").with_role(GraphRole::new("nobody", false, false));
    assert!(has_permission(&graph, "", Access::Read));
    assert!(has_permission(&graph, "", Access::Write));
    assert!(!has_permission(&graph, "nobody", Access::Read));

    let catalog = InMemoryCatalog::new();
    catalog.register_graph(graph);
    let output = validate(
        Arc::new(catalog),
        "MATCH (n) RETURN n; DELETE n",
        &Options::new(),
    )
    .expect("anonymous bypass");
    assert_eq!(output.len(), 2);
}

#[test]
fn catalog_returns_deep_copies() {
    let catalog = social_catalog();
    let ctx = ExecutionContext::new();
    let mut graph = catalog.lookup_graph(&ctx, "social").expect("registered");
    graph.roles.clear();
    graph.default_schema = "tampered".into();

    let output = validate(
        Arc::clone(&catalog),
        "MATCH (n) RETURN n",
        &Options::new().with_role("reader"),
    )
    .expect("catalog unaffected");
    assert_eq!(output.statements[0].schema, "public");
}

#[test]
fn cancelled_before_validation() {
    let script = parse_cleanly("MATCH (n) RETURN n");
    let ctx = ExecutionContext::new();
    ctx.cancel();
    let err = Validator::new(social_catalog())
        .validate(&ctx, &script, &Options::new())
        .expect_err("cancelled");
    assert_eq!(err, ValidateError::Cancelled(Cancelled::Cancelled));
}

#[test]
fn expired_deadline_aborts() {
    let script = parse_cleanly("MATCH (n) RETURN n");
    let ctx = ExecutionContext::new().with_deadline(Instant::now() - Duration::from_millis(5));
    let err = Validator::new(social_catalog())
        .validate(&ctx, &script, &Options::new())
        .expect_err("deadline passed");
    assert_eq!(err, ValidateError::Cancelled(Cancelled::DeadlineExceeded));
    assert_eq!(err.to_string(), "context deadline exceeded");
}

/// Catalog double that cancels its context after a number of lookups.
struct CancellingCatalog {
    inner: Arc<InMemoryCatalog>,
    ctx: ExecutionContext,
    remaining: AtomicUsize,
}

impl Catalog for CancellingCatalog {
    fn lookup_graph(&self, ctx: &ExecutionContext, name: &str) -> CatalogResult<Graph> {
        if self.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.ctx.cancel();
        }
        self.inner.lookup_graph(ctx, name)
    }

    fn default_graph(&self, ctx: &ExecutionContext) -> CatalogResult<Graph> {
        self.inner.default_graph(ctx)
    }
}

#[test]
fn cancellation_mid_script_yields_no_partial_result() {
    let ctx = ExecutionContext::new();
    let catalog = CancellingCatalog {
        inner: social_catalog(),
        ctx: ctx.clone(),
        remaining: AtomicUsize::new(1),
    };
    // The first USE lookup cancels the context it runs under.
    let script = parse_cleanly("USE social; USE nowhere; MATCH (n) RETURN q");
    let err = Validator::new(Arc::new(catalog))
        .validate(&ctx, &script, &Options::new())
        .expect_err("cancelled");
    assert!(matches!(err, ValidateError::Cancelled(_)));
    assert!(err.diagnostics().is_none());
}

#[test]
fn catalog_errors_display() {
    assert_eq!(
        CatalogError::GraphNotFound {
            graph: "x".into()
        }
        .to_string(),
        "graph not found"
    );
    assert_eq!(
        CatalogError::from(Cancelled::Cancelled).to_string(),
        "context canceled"
    );
}

#[test]
fn wire_shape_of_semantic_failure() {
    let err = match validate(social_catalog(), "USE nowhere", &Options::new()) {
        Err(ValidateError::Semantic(err)) => err,
        other => panic!("expected semantic failure, got {other:?}"),
    };
    let value = serde_json::to_value(&err).expect("serializes");
    assert_eq!(
        value,
        serde_json::json!({
            "error": "gql: semantic analysis failed",
            "diagnostics": [{
                "severity": "ERROR",
                "message": "graph \"nowhere\" not found",
                "statement": "USE nowhere",
                "line": 1,
                "column": 1,
                "code": "CATALOG_GRAPH_UNDEFINED",
            }],
        })
    );
}

#[test]
fn validate_error_displays_aggregate_once() {
    let err = validate(social_catalog(), "USE nowhere", &Options::new()).expect_err("unknown graph");
    let aggregate = err.diagnostics().expect("semantic failure");
    assert_eq!(err.to_string(), aggregate.to_string());
    assert!(std::error::Error::source(&err).is_none());
    assert_eq!(
        gql_frontend::diag::DiagnosticError::find(&err),
        Some(aggregate)
    );
}
