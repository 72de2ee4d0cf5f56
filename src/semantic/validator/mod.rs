//! Main semantic validator.
//!
//! The validator walks a parsed [`Script`] once, left to right, carrying the
//! active graph and schema from statement to statement. `USE` switches the
//! active graph; `MATCH` and commands are checked against it.
//!
//! Unlike the parser, the validator batches its errors: every statement is
//! checked, failing statements contribute one diagnostic each, and all
//! diagnostics are returned together sorted by position. Cancellation is the
//! exception and aborts the pass immediately.

mod reference_validation;
mod variable_validation;

use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::ast::{Script, Statement};
use crate::diag::{Diagnostic, DiagnosticError};
use crate::lexer::keywords::is_write_keyword;
use crate::semantic::catalog::{Access, Catalog, Graph};
use crate::semantic::context::{Cancelled, ExecutionContext};
use crate::semantic::diag::SemanticDiagBuilder;

pub use variable_validation::{extract_variables, unresolved_variables};

/// Summary of every semantic failure aggregate.
pub const SEMANTIC_SUMMARY: &str = "gql: semantic analysis failed";

/// Caller-supplied validation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Role checked against graph permissions; empty is anonymous.
    pub role: String,
    /// Graph to start on, if registered.
    pub default_graph: String,
    /// Schema to start on; overrides the initial graph's default schema.
    pub default_schema: String,
}

impl Options {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets the starting graph.
    pub fn with_default_graph(mut self, graph: impl Into<String>) -> Self {
        self.default_graph = graph.into();
        self
    }

    /// Sets the starting schema.
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }
}

/// A statement that passed validation, with the context it ran under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedStatement {
    pub statement: Statement,
    pub graph: Graph,
    pub schema: String,
    /// Variables bound by a MATCH pattern; empty for other statements.
    pub variables: Vec<String>,
}

/// Successful validation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutput {
    pub statements: Vec<CheckedStatement>,
}

impl ValidationOutput {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckedStatement> {
        self.statements.iter()
    }
}

/// Error type for validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// The execution context stopped the pass.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// One or more statements failed.
    #[error(transparent)]
    Semantic(#[from] DiagnosticError),
}

impl ValidateError {
    /// Returns the diagnostic aggregate, if this is a semantic failure.
    pub fn diagnostics(&self) -> Option<&DiagnosticError> {
        match self {
            Self::Semantic(err) => Some(err),
            Self::Cancelled(_) => None,
        }
    }
}

/// Anything that can validate a script.
pub trait Validate: Send + Sync {
    fn validate(
        &self,
        ctx: &ExecutionContext,
        script: &Script,
        options: &Options,
    ) -> Result<ValidationOutput, ValidateError>;
}

/// Catalog-backed semantic validator.
#[derive(Clone)]
pub struct Validator {
    catalog: Arc<dyn Catalog>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// Graph and schema in effect for the next statement.
struct ActiveContext {
    graph: Option<Graph>,
    schema: String,
}

impl Validator {
    /// Creates a validator that resolves graphs through `catalog`.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Validates `script`.
    ///
    /// Returns the checked statements in source order, or every diagnostic
    /// found sorted by `(line, column)`.
    pub fn validate(
        &self,
        ctx: &ExecutionContext,
        script: &Script,
        options: &Options,
    ) -> Result<ValidationOutput, ValidateError> {
        if script.is_empty() {
            return Ok(ValidationOutput::default());
        }

        let catalog = self.catalog.as_ref();
        let graph =
            reference_validation::resolve_initial_graph(catalog, ctx, &options.default_graph)?;
        let schema = if !options.default_schema.is_empty() {
            options.default_schema.clone()
        } else {
            graph
                .as_ref()
                .map(|g| g.default_schema.clone())
                .unwrap_or_default()
        };
        let mut active = ActiveContext { graph, schema };

        let mut diagnostics = Vec::new();
        let mut checked = Vec::new();
        for statement in script {
            ctx.check()?;
            match self.check_statement(ctx, statement, options, &mut active)? {
                Ok(stmt) => checked.push(stmt),
                Err(diag) => {
                    debug!("statement at {} rejected: {}", statement.position(), diag);
                    diagnostics.push(diag);
                }
            }
        }

        if !diagnostics.is_empty() {
            // Stable, so same-position diagnostics keep statement order.
            diagnostics.sort_by_key(|d| (d.line, d.column));
            info!(
                "semantic analysis rejected script with {} diagnostic(s)",
                diagnostics.len()
            );
            return Err(DiagnosticError::new(SEMANTIC_SUMMARY, &diagnostics).into());
        }
        debug!("validated {} statement(s)", checked.len());
        Ok(ValidationOutput { statements: checked })
    }

    fn check_statement(
        &self,
        ctx: &ExecutionContext,
        statement: &Statement,
        options: &Options,
        active: &mut ActiveContext,
    ) -> Result<Result<CheckedStatement, Diagnostic>, Cancelled> {
        if let Statement::UseGraph(use_graph) = statement {
            let target = reference_validation::resolve_use_target(
                self.catalog.as_ref(),
                ctx,
                statement,
                &use_graph.graph,
            )?;
            return Ok(target.map(|graph| {
                active.schema = graph.default_schema.clone();
                active.graph = Some(graph.clone());
                CheckedStatement {
                    statement: statement.clone(),
                    graph,
                    schema: active.schema.clone(),
                    variables: Vec::new(),
                }
            }));
        }

        let Some(graph) = &active.graph else {
            return Ok(Err(SemanticDiagBuilder::graph_missing()
                .for_statement(statement)
                .build()));
        };

        let variables = match statement {
            Statement::Match(m) => {
                if let Some(diag) =
                    reference_validation::check_access(graph, &options.role, Access::Read, statement)
                {
                    return Ok(Err(diag));
                }
                let variables = extract_variables(&m.pattern);
                let missing = unresolved_variables(&variables, &m.projections);
                if !missing.is_empty() {
                    return Ok(Err(SemanticDiagBuilder::unknown_variables(&missing)
                        .for_statement(statement)
                        .build()));
                }
                variables
            }
            Statement::Command(c) => {
                if is_write_keyword(&c.keyword) {
                    if let Some(diag) = reference_validation::check_access(
                        graph,
                        &options.role,
                        Access::Write,
                        statement,
                    ) {
                        return Ok(Err(diag));
                    }
                }
                Vec::new()
            }
            Statement::UseGraph(_) => Vec::new(),
        };

        Ok(Ok(CheckedStatement {
            statement: statement.clone(),
            graph: graph.clone(),
            schema: active.schema.clone(),
            variables,
        }))
    }
}

impl Validate for Validator {
    fn validate(
        &self,
        ctx: &ExecutionContext,
        script: &Script,
        options: &Options,
    ) -> Result<ValidationOutput, ValidateError> {
        Validator::validate(self, ctx, script, options)
    }
}
