//! Structured diagnostic model shared by the parser, the validator and the
//! session layer.
//!
//! A [`Diagnostic`] is one positioned problem report. A [`DiagnosticError`]
//! aggregates zero or more of them under a summary and is the error type
//! surfaced for both parse and semantic failures. Both serialize to the wire
//! shape used by HTTP and CLI surfaces:
//!
//! ```json
//! {"error": "gql: semantic analysis failed",
//!  "diagnostics": [{"severity": "ERROR", "message": "...", "line": 1, "column": 1}]}
//! ```

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Report};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::semantic::ValidateError;
use crate::session::ExecuteError;

/// Summary used when an aggregate is rendered without one.
const FALLBACK_SUMMARY: &str = "gql: error";

/// Boxed error type accepted by [`append`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// A problem that prevents the script from being accepted.
    #[default]
    Error,
    /// A suspicious construct that does not block acceptance.
    Warning,
    /// Informational output.
    Info,
}

impl Severity {
    /// Returns the wire name of this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for miette::Severity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Info => miette::Severity::Advice,
        }
    }
}

/// Machine-readable tags attached to diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Malformed script text.
    ParseError,
    /// `USE` names a graph that is not registered.
    CatalogGraphUndefined,
    /// A statement needs a graph but none is active.
    CatalogGraphMissing,
    /// The active role lacks the required permission.
    AuthorizationDenied,
    /// A projection references a name the pattern never binds.
    SemanticUnknownVariable,
}

impl DiagnosticCode {
    /// Returns the tag as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::CatalogGraphUndefined => "CATALOG_GRAPH_UNDEFINED",
            Self::CatalogGraphMissing => "CATALOG_GRAPH_MISSING",
            Self::AuthorizationDenied => "AUTHORIZATION_DENIED",
            Self::SemanticUnknownVariable => "SEMANTIC_UNKNOWN_VARIABLE",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, positioned problem report.
///
/// Optional fields use their empty value (`""` or `0`) to mean "unset" and
/// are skipped when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    #[serde(default)]
    pub severity: Severity,
    /// The main diagnostic message.
    pub message: String,
    /// Source text of the statement this diagnostic refers to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub statement: String,
    /// 1-based line, 0 when unknown.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: usize,
    /// 1-based column, 0 when unknown.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub column: usize,
    /// Machine-readable tag such as `AUTHORIZATION_DENIED`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    /// Additional free-form explanation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl Diagnostic {
    /// Creates a new diagnostic with the given severity and message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates a new informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Sets the source statement text.
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    /// Sets the 1-based line and column.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl fmt::Display) -> Self {
        self.code = code.to_string();
        self
    }

    /// Sets the detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Returns true when this diagnostic carries the given code.
    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.code == code.as_str()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}

impl MietteDiagnostic for Diagnostic {
    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity.into())
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.code.is_empty() {
            None
        } else {
            Some(Box::new(&self.code))
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.detail.is_empty() {
            None
        } else {
            Some(Box::new(&self.detail))
        }
    }
}

/// An error carrying a summary and zero or more diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticError {
    /// One-line summary of the failure.
    #[serde(rename = "error")]
    pub summary: String,
    /// The individual problems, in report order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticError {
    /// Creates an aggregate owning an independent copy of `diagnostics`.
    pub fn new<'a>(
        summary: impl Into<String>,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    ) -> Self {
        Self {
            summary: summary.into(),
            diagnostics: diagnostics.into_iter().cloned().collect(),
        }
    }

    /// Creates an aggregate holding a single diagnostic.
    pub fn single(summary: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            summary: summary.into(),
            diagnostics: vec![diagnostic],
        }
    }

    /// Extends the diagnostics in place.
    pub fn append(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Finds a `DiagnosticError` in `err` or its chain of sources.
    ///
    /// The crate's own error enums wrap aggregates transparently, so they
    /// are unwrapped here as well as through `source()`.
    pub fn find<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a DiagnosticError> {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(found) = aggregate_of(e) {
                return Some(found);
            }
            current = e.source();
        }
        None
    }

    /// Converts this aggregate into a miette report with source context.
    ///
    /// Each diagnostic with a known position becomes a related report
    /// labelled at the byte offset its line and column resolve to.
    pub fn to_report(&self, source: &SourceFile) -> Report {
        let located = LocatedError {
            summary: self.summary_or_fallback().to_string(),
            entries: self
                .diagnostics
                .iter()
                .map(|diag| LocatedDiagnostic::new(diag, source))
                .collect(),
        };

        let report = Report::new(located);
        if let Some(name) = source.name() {
            report.with_source_code(miette::NamedSource::new(name, source.content().to_string()))
        } else {
            report.with_source_code(source.content().to_string())
        }
    }

    fn summary_or_fallback(&self) -> &str {
        if self.summary.is_empty() {
            FALLBACK_SUMMARY
        } else {
            &self.summary
        }
    }
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return f.write_str(&self.summary);
        }
        f.write_str(self.summary_or_fallback())?;
        for diag in &self.diagnostics {
            if diag.statement.is_empty() {
                write!(f, ": {}", diag.message)?;
            } else {
                write!(
                    f,
                    ": {} at line {}, column {}",
                    diag.message, diag.line, diag.column
                )?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticError {}

fn aggregate_of<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a DiagnosticError> {
    if let Some(found) = err.downcast_ref::<DiagnosticError>() {
        return Some(found);
    }
    if let Some(validate) = err.downcast_ref::<ValidateError>() {
        return validate.diagnostics();
    }
    err.downcast_ref::<ExecuteError>()
        .and_then(ExecuteError::diagnostics)
}

impl MietteDiagnostic for DiagnosticError {
    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn MietteDiagnostic> + 'a>> {
        if self.diagnostics.is_empty() {
            None
        } else {
            Some(Box::new(
                self.diagnostics.iter().map(|d| d as &dyn MietteDiagnostic),
            ))
        }
    }
}

/// Appends diagnostics to `err`.
///
/// A top-level [`DiagnosticError`] is extended in place. An aggregate found
/// deeper in the chain (see [`DiagnosticError::find`]) is copied and the copy
/// extended. Any other error becomes the summary of a new aggregate. With no
/// diagnostics `err` is returned untouched.
pub fn append(err: BoxError, diagnostics: Vec<Diagnostic>) -> BoxError {
    if diagnostics.is_empty() {
        return err;
    }
    match err.downcast::<DiagnosticError>() {
        Ok(mut aggregate) => {
            aggregate.append(diagnostics);
            aggregate
        }
        Err(other) => match DiagnosticError::find(&*other) {
            Some(found) => {
                let mut aggregate = found.clone();
                aggregate.append(diagnostics);
                Box::new(aggregate)
            }
            None => Box::new(DiagnosticError {
                summary: other.to_string(),
                diagnostics,
            }),
        },
    }
}

/// Formats diagnostics one per line.
///
/// Each line reads `SEVERITY [code] at L:C (statement): message`, followed
/// by a dash and the detail when one is set. Every optional part is present
/// only when its field is set.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for (i, d) in diagnostics.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(d.severity.as_str());
        if !d.code.is_empty() {
            out.push_str(&format!(" [{}]", d.code));
        }
        if d.line > 0 {
            out.push_str(&format!(" at {}:{}", d.line, d.column));
        }
        if !d.statement.is_empty() {
            out.push_str(&format!(" ({})", d.statement));
        }
        if !d.message.is_empty() {
            out.push_str(&format!(": {}", d.message));
        }
        if !d.detail.is_empty() {
            out.push_str(&format!(" — {}", d.detail));
        }
    }
    out
}

/// A wrapper around source text for diagnostic rendering.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The source text content.
    content: String,
    /// Optional filename for display purposes.
    name: Option<String>,
}

impl SourceFile {
    /// Creates a new source file from the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
        }
    }

    /// Creates a new source file with a name.
    pub fn with_name(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the source content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the source file name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolves a 1-based line and character column to a byte offset.
    ///
    /// Columns past the end of the line clamp to the line end. Returns `None`
    /// for unset positions or lines beyond the source.
    pub fn offset_of(&self, line: usize, column: usize) -> Option<usize> {
        if line == 0 || column == 0 {
            return None;
        }
        let mut line_start = 0;
        for _ in 1..line {
            let rest = &self.content[line_start..];
            line_start += rest.find('\n')? + 1;
        }
        let line_text = self.content[line_start..]
            .split('\n')
            .next()
            .unwrap_or_default();
        let within = line_text
            .char_indices()
            .nth(column - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(line_text.len());
        Some(line_start + within)
    }
}

#[derive(Debug)]
struct LocatedError {
    summary: String,
    entries: Vec<LocatedDiagnostic>,
}

impl fmt::Display for LocatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

impl std::error::Error for LocatedError {}

impl MietteDiagnostic for LocatedError {
    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn MietteDiagnostic> + 'a>> {
        if self.entries.is_empty() {
            None
        } else {
            Some(Box::new(
                self.entries.iter().map(|e| e as &dyn MietteDiagnostic),
            ))
        }
    }
}

#[derive(Debug)]
struct LocatedDiagnostic {
    diagnostic: Diagnostic,
    label: Option<LabeledSpan>,
}

impl LocatedDiagnostic {
    fn new(diagnostic: &Diagnostic, source: &SourceFile) -> Self {
        let label = source
            .offset_of(diagnostic.line, diagnostic.column)
            .map(|offset| {
                let len = diagnostic
                    .statement
                    .lines()
                    .next()
                    .map(str::len)
                    .unwrap_or(0)
                    .min(source.content().len().saturating_sub(offset));
                let text = if diagnostic.code.is_empty() {
                    "here".to_string()
                } else {
                    diagnostic.code.clone()
                };
                LabeledSpan::new_primary_with_span(Some(text), (offset, len))
            });
        Self {
            diagnostic: diagnostic.clone(),
            label,
        }
    }
}

impl fmt::Display for LocatedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message)
    }
}

impl std::error::Error for LocatedDiagnostic {}

impl MietteDiagnostic for LocatedDiagnostic {
    fn severity(&self) -> Option<miette::Severity> {
        MietteDiagnostic::severity(&self.diagnostic)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        MietteDiagnostic::code(&self.diagnostic)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        MietteDiagnostic::help(&self.diagnostic)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.label
            .clone()
            .map(|label| Box::new(std::iter::once(label)) as Box<dyn Iterator<Item = LabeledSpan>>)
    }
}
