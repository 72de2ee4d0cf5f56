//! Graph catalog consumed by the semantic validator.
//!
//! The validator depends only on the [`Catalog`] trait, which exposes graph
//! lookup by name and default-graph resolution. [`InMemoryCatalog`] is the
//! production implementation: a registry guarded by a reader/writer lock that
//! hands out independent clones of its graphs, so callers can never mutate
//! catalog state through a returned value.

use crate::config::CatalogConfig;
use crate::semantic::context::{Cancelled, ExecutionContext};
use log::trace;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Result type for catalog lookups that may fail.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error type for catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No graph is registered under the requested name.
    #[error("graph not found")]
    GraphNotFound { graph: String },

    /// No default was set and the catalog is empty.
    #[error("no default graph configured")]
    NoDefaultGraph,

    /// The configured default graph name does not resolve.
    #[error("default graph not registered")]
    DefaultGraphNotRegistered { graph: String },

    /// The execution context stopped the lookup.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Read or write access to a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Permissions of one role on one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphRole {
    pub name: String,
    pub can_read: bool,
    pub can_write: bool,
}

impl GraphRole {
    /// Creates a role with explicit permissions.
    pub fn new(name: impl Into<String>, can_read: bool, can_write: bool) -> Self {
        Self {
            name: name.into(),
            can_read,
            can_write,
        }
    }

    /// Creates a read-only role.
    pub fn reader(name: impl Into<String>) -> Self {
        Self::new(name, true, false)
    }

    /// Creates a read-write role.
    pub fn writer(name: impl Into<String>) -> Self {
        Self::new(name, true, true)
    }

    /// Returns true if this role grants `access`.
    pub fn allows(&self, access: Access) -> bool {
        match access {
            Access::Read => self.can_read,
            Access::Write => self.can_write,
        }
    }
}

/// A named set of types within a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub name: String,
    pub types: BTreeSet<String>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: BTreeSet::new(),
        }
    }

    /// Adds a type name.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.insert(type_name.into());
        self
    }
}

/// A named data space with a default schema and per-role permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub name: String,
    pub default_schema: String,
    pub schemas: BTreeMap<String, Schema>,
    pub roles: BTreeMap<String, GraphRole>,
}

impl Graph {
    /// Creates a graph with no schemas and no roles.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the default schema name.
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    /// Adds or replaces a schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.insert(schema.name.clone(), schema);
        self
    }

    /// Adds or replaces a role.
    pub fn with_role(mut self, role: GraphRole) -> Self {
        self.roles.insert(role.name.clone(), role);
        self
    }
}

/// Checks whether `role` may access `graph`.
///
/// The empty role is anonymous and always allowed. A role missing from the
/// graph's role table is always denied.
pub fn has_permission(graph: &Graph, role: &str, access: Access) -> bool {
    if role.is_empty() {
        return true;
    }
    graph
        .roles
        .get(role)
        .is_some_and(|perm| perm.allows(access))
}

/// Graph lookup capability used by the validator.
///
/// Implementations must return values the caller owns outright.
pub trait Catalog: Send + Sync {
    /// Looks up a graph by name.
    fn lookup_graph(&self, ctx: &ExecutionContext, name: &str) -> CatalogResult<Graph>;

    /// Resolves the catalog's default graph.
    fn default_graph(&self, ctx: &ExecutionContext) -> CatalogResult<Graph>;
}

#[derive(Debug, Default)]
struct CatalogState {
    graphs: BTreeMap<String, Graph>,
    default_graph: Option<String>,
}

/// Thread-safe in-memory catalog.
///
/// Lookups take a shared lock and run concurrently; registration and
/// default-graph changes take the exclusive lock.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded from configuration.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let catalog = Self::new();
        for graph in &config.graphs {
            catalog.register_graph(Graph::from(graph));
        }
        catalog.set_default_graph(config.default_graph.clone());
        catalog
    }

    /// Registers `graph`, replacing any graph with the same name.
    pub fn register_graph(&self, graph: Graph) {
        trace!("registering graph {:?}", graph.name);
        let mut state = self.state.write();
        state.graphs.insert(graph.name.clone(), graph);
    }

    /// Records the default graph name. The name is not checked until lookup;
    /// an empty name clears the default.
    pub fn set_default_graph(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.state.write();
        state.default_graph = (!name.is_empty()).then_some(name);
    }

    /// Returns the registered graph names in order.
    pub fn graph_names(&self) -> Vec<String> {
        self.state.read().graphs.keys().cloned().collect()
    }

    /// Returns the number of registered graphs.
    pub fn len(&self) -> usize {
        self.state.read().graphs.len()
    }

    /// Returns true if no graph is registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().graphs.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn lookup_graph(&self, ctx: &ExecutionContext, name: &str) -> CatalogResult<Graph> {
        ctx.check()?;
        let state = self.state.read();
        trace!("catalog lookup {name:?}");
        state
            .graphs
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::GraphNotFound {
                graph: name.to_string(),
            })
    }

    fn default_graph(&self, ctx: &ExecutionContext) -> CatalogResult<Graph> {
        ctx.check()?;
        let state = self.state.read();
        match &state.default_graph {
            // Without an explicit default, any registered graph will do; the
            // map is ordered, so this is the first by name.
            None => state
                .graphs
                .values()
                .next()
                .cloned()
                .ok_or(CatalogError::NoDefaultGraph),
            Some(name) => state.graphs.get(name).cloned().ok_or_else(|| {
                CatalogError::DefaultGraphNotRegistered {
                    graph: name.clone(),
                }
            }),
        }
    }
}
