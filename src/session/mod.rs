//! Query sessions.
//!
//! A [`Session`] binds a catalog, a validator, a role and a milestone, and
//! runs scripts through the front-end stages the milestone enables. Query
//! execution is not part of this crate, so a script that passes every
//! enabled stage ends in [`ExecuteError::NotImplemented`] or a milestone
//! error.

pub mod milestone;

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::diag::DiagnosticError;
use crate::parser::parse_script;
use crate::semantic::{
    Cancelled, Catalog, ExecutionContext, Graph, GraphRole, InMemoryCatalog, Options, Validate,
    ValidateError, ValidationOutput, Validator,
};

pub use milestone::{Capability, Milestone, MilestoneError};

/// Graph seeded into the catalog of a session without one.
pub const DEFAULT_GRAPH: &str = "default";
/// Role used when none is configured.
pub const DEFAULT_ROLE: &str = "anonymous";

/// HTTP status used for every front-end error response.
pub const HTTP_BAD_REQUEST: u16 = 400;

/// Error type for session execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// The input was blank; the caller should supply more text.
    #[error("gql: query is incomplete")]
    ParseMore,

    #[error(transparent)]
    Milestone(#[from] MilestoneError),

    /// Parsing or semantic validation failed.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// Every enabled stage passed but there is no executor.
    #[error("gql: execution is not yet implemented")]
    NotImplemented,
}

impl ExecuteError {
    /// Returns the diagnostic aggregate, if parsing or validation failed.
    pub fn diagnostics(&self) -> Option<&DiagnosticError> {
        match self {
            Self::Diagnostics(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidateError> for ExecuteError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::Cancelled(cancelled) => ExecuteError::Cancelled(cancelled),
            ValidateError::Semantic(diagnostics) => ExecuteError::Diagnostics(diagnostics),
        }
    }
}

/// A configured front-end session.
#[derive(Clone)]
pub struct Session {
    catalog: Arc<dyn Catalog>,
    validator: Arc<dyn Validate>,
    role: String,
    default_graph: String,
    default_schema: String,
    milestone: Milestone,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("default_graph", &self.default_graph)
            .field("default_schema", &self.default_schema)
            .field("milestone", &self.milestone)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Creates a session over a seeded catalog holding the `default` graph,
    /// readable (not writable) by the `anonymous` role.
    pub fn new(config: SessionConfig) -> Self {
        let catalog = InMemoryCatalog::new();
        catalog.register_graph(
            Graph::new(DEFAULT_GRAPH).with_role(GraphRole::reader(DEFAULT_ROLE)),
        );
        catalog.set_default_graph(DEFAULT_GRAPH);
        let catalog: Arc<dyn Catalog> = Arc::new(catalog);

        let default_graph = if config.default_graph.is_empty() {
            DEFAULT_GRAPH.to_string()
        } else {
            config.default_graph
        };
        Self {
            validator: Arc::new(Validator::new(Arc::clone(&catalog))),
            catalog,
            role: String::new(),
            default_graph,
            default_schema: config.default_schema,
            milestone: config.milestone,
        }
        .with_role(config.role)
    }

    /// Replaces the catalog and resets the validator to one backed by it.
    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.validator = Arc::new(Validator::new(Arc::clone(&catalog)));
        self.catalog = catalog;
        self
    }

    /// Replaces the validator.
    pub fn with_validator(mut self, validator: Arc<dyn Validate>) -> Self {
        self.validator = validator;
        self
    }

    /// Sets the role; an empty role means [`DEFAULT_ROLE`].
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        let role = role.into();
        self.role = if role.is_empty() {
            DEFAULT_ROLE.to_string()
        } else {
            role
        };
        self
    }

    pub fn with_default_graph(mut self, graph: impl Into<String>) -> Self {
        self.default_graph = graph.into();
        self
    }

    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestone = milestone;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn milestone(&self) -> Milestone {
        self.milestone
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Returns the validation options this session passes for every script.
    pub fn options(&self) -> Options {
        Options {
            role: self.role.clone(),
            default_graph: self.default_graph.clone(),
            default_schema: self.default_schema.clone(),
        }
    }

    /// Runs `input` through every stage the milestone enables.
    ///
    /// Never returns `Ok` while execution is unavailable: a script that
    /// passes validation ends in a milestone error or
    /// [`ExecuteError::NotImplemented`].
    pub fn execute(
        &self,
        ctx: &ExecutionContext,
        input: &str,
    ) -> Result<ValidationOutput, ExecuteError> {
        if input.trim().is_empty() {
            return Err(ExecuteError::ParseMore);
        }
        self.milestone.require(Capability::Parsing)?;
        let script = parse_script(input).inspect_err(|err| warn!("parse failed: {err}"))?;

        self.milestone.require(Capability::SemanticValidation)?;
        let output = self
            .validator
            .validate(ctx, &script, &self.options())
            .inspect_err(|err| warn!("validation failed: {err}"))?;
        debug!("{} statement(s) validated", output.len());

        self.milestone.require(Capability::Execution)?;
        info!("script accepted but execution is unavailable");
        Err(ExecuteError::NotImplemented)
    }

    /// Parses and validates `input` regardless of milestone.
    pub fn check(
        &self,
        ctx: &ExecutionContext,
        input: &str,
    ) -> Result<ValidationOutput, ExecuteError> {
        let script = parse_script(input)?;
        Ok(self.validator.validate(ctx, &script, &self.options())?)
    }
}

/// Encodes `err` as an HTTP error response.
///
/// Diagnostic aggregates anywhere in the error chain are sent in their wire
/// form; anything else becomes `{"error": message}`.
pub fn http_error(err: &(dyn std::error::Error + 'static)) -> (u16, Value) {
    let body = match DiagnosticError::find(err).map(serde_json::to_value) {
        Some(Ok(value)) => value,
        _ => json!({ "error": err.to_string() }),
    };
    (HTTP_BAD_REQUEST, body)
}
