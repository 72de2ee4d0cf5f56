//! Semantic validation for parsed GQL scripts.
//!
//! Parsing only checks statement shape. This module checks a [`Script`]
//! against a graph catalog:
//! - `USE` targets must be registered graphs
//! - `MATCH` and commands need an active graph
//! - the session role must be allowed to read (MATCH) or write (data and
//!   schema modifying commands) the active graph
//! - `RETURN` items must reference variables bound by the MATCH pattern
//!
//! Semantic failures are collected across the whole script and reported as
//! one [`DiagnosticError`](crate::diag::DiagnosticError).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gql_frontend::parse_script;
//! use gql_frontend::semantic::{
//!     ExecutionContext, Graph, GraphRole, InMemoryCatalog, Options, Validator,
//! };
//!
//! let catalog = InMemoryCatalog::new();
//! catalog.register_graph(Graph::new("social").with_role(GraphRole::reader("analyst")));
//!
//! let script = parse_script("USE social; MATCH (n) RETURN n").unwrap();
//! let output = Validator::new(Arc::new(catalog))
//!     .validate(&ExecutionContext::new(), &script, &Options::new().with_role("analyst"))
//!     .unwrap();
//! assert_eq!(output.statements[1].variables, vec!["n"]);
//! ```
//!
//! [`Script`]: crate::ast::Script

pub mod catalog;
pub mod context;
pub mod diag;
pub mod validator;

pub use catalog::{
    Access, Catalog, CatalogError, CatalogResult, Graph, GraphRole, InMemoryCatalog, Schema,
    has_permission,
};
pub use context::{Cancelled, ExecutionContext};
pub use validator::{
    CheckedStatement, Options, SEMANTIC_SUMMARY, Validate, ValidateError, ValidationOutput,
    Validator,
};
