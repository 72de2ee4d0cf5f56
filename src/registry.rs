//! Query language registry.
//!
//! Hosts that serve several query languages look languages up by name. The
//! registry is an ordinary value, built once at startup and passed to
//! whatever needs it.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::session::Session;

/// Creates a session with default settings.
pub type SessionFactory = fn() -> Session;

/// Encodes an error as an HTTP status and JSON body.
pub type HttpErrorEncoder = fn(&(dyn Error + 'static)) -> (u16, Value);

/// Descriptor for one query language.
#[derive(Clone, Copy)]
pub struct Language {
    pub name: &'static str,
    pub session: SessionFactory,
    pub http_error: HttpErrorEncoder,
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("language {0:?} is already registered")]
    Duplicate(String),
}

/// Name-keyed set of languages.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    languages: BTreeMap<&'static str, Language>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the languages this crate provides.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let gql = crate::language();
        registry.languages.insert(gql.name, gql);
        registry
    }

    /// Adds `language`, refusing to replace an existing entry.
    pub fn register(&mut self, language: Language) -> Result<(), RegistryError> {
        if self.languages.contains_key(language.name) {
            return Err(RegistryError::Duplicate(language.name.to_string()));
        }
        debug!("registered query language {:?}", language.name);
        self.languages.insert(language.name, language);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages.get(name)
    }

    /// Returns registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.languages.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ExecutionContext;
    use crate::session::ExecuteError;

    #[test]
    fn test_defaults_include_gql() {
        let registry = LanguageRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["gql"]);
        let gql = registry.get("gql").expect("gql registered");
        let session = (gql.session)();
        assert_eq!(
            session.execute(&ExecutionContext::new(), ""),
            Err(ExecuteError::ParseMore)
        );
        let (status, _) = (gql.http_error)(&ExecuteError::NotImplemented);
        assert_eq!(status, 400);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = LanguageRegistry::with_defaults();
        let err = registry
            .register(crate::language())
            .expect_err("duplicate");
        assert_eq!(err, RegistryError::Duplicate("gql".into()));
        assert_eq!(err.to_string(), "language \"gql\" is already registered");
    }

    #[test]
    fn test_unknown_language() {
        let registry = LanguageRegistry::new();
        assert!(registry.get("gizmo").is_none());
        assert!(registry.names().is_empty());
    }
}
