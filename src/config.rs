//! TOML configuration for sessions and catalog seed data.
//!
//! ```toml
//! [session]
//! role = "analyst"
//! default_graph = "social"
//! milestone = "milestone2-parser-validation"
//!
//! [catalog]
//! default_graph = "social"
//!
//! [[catalog.graphs]]
//! name = "social"
//! default_schema = "public"
//! schemas = [{ name = "public", types = ["Person"] }]
//! roles = [{ name = "analyst", can_read = true }]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::semantic::catalog::{Graph, GraphRole, Schema};
use crate::session::milestone::Milestone;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings applied to every statement a session validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub role: String,
    pub default_graph: String,
    pub default_schema: String,
    pub milestone: Milestone,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: String::new(),
            default_graph: String::new(),
            default_schema: String::new(),
            milestone: Milestone::ParserValidation,
        }
    }
}

/// Seed data for an in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub default_graph: String,
    pub graphs: Vec<GraphConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub name: String,
    pub default_schema: String,
    pub schemas: Vec<SchemaConfig>,
    pub roles: Vec<RoleConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    pub name: String,
    pub can_read: bool,
    pub can_write: bool,
}

impl From<&GraphConfig> for Graph {
    fn from(config: &GraphConfig) -> Self {
        let graph = Graph::new(config.name.clone()).with_default_schema(config.default_schema.clone());
        let graph = config.schemas.iter().fold(graph, |graph, schema| {
            let schema = schema
                .types
                .iter()
                .fold(Schema::new(schema.name.clone()), |s, t| s.with_type(t.clone()));
            graph.with_schema(schema)
        });
        config.roles.iter().fold(graph, |graph, role| {
            graph.with_role(GraphRole::new(role.name.clone(), role.can_read, role.can_write))
        })
    }
}

/// Complete front-end configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
}

impl FrontendConfig {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[session]
role = "analyst"
default_graph = "social"

[catalog]
default_graph = "social"

[[catalog.graphs]]
name = "social"
default_schema = "public"
schemas = [{ name = "public", types = ["Person", "Company"] }]
roles = [
    { name = "analyst", can_read = true },
    { name = "admin", can_read = true, can_write = true },
]

[[catalog.graphs]]
name = "audit"
"#;

    #[test]
    fn test_config_default() {
        let config = FrontendConfig::default();
        assert_eq!(config.session.milestone, Milestone::ParserValidation);
        assert!(config.session.role.is_empty());
        assert!(config.catalog.graphs.is_empty());
    }

    #[test]
    fn test_parse_sample() {
        let config = FrontendConfig::from_toml(SAMPLE).expect("valid toml");
        assert_eq!(config.session.role, "analyst");
        assert_eq!(config.session.milestone, Milestone::ParserValidation);
        assert_eq!(config.catalog.graphs.len(), 2);

        let social = Graph::from(&config.catalog.graphs[0]);
        assert_eq!(social.default_schema, "public");
        assert!(social.schemas["public"].types.contains("Company"));
        assert!(social.roles["analyst"].can_read);
        assert!(!social.roles["analyst"].can_write);
        assert!(social.roles["admin"].can_write);

        let audit = Graph::from(&config.catalog.graphs[1]);
        assert!(audit.roles.is_empty());
    }

    #[test]
    fn test_parse_milestone() {
        let config = FrontendConfig::from_toml(
            "[session]\nmilestone = \"milestone1-readiness\"\n",
        )
        .expect("valid toml");
        assert_eq!(config.session.milestone, Milestone::Readiness);
    }

    #[test]
    fn test_parse_error() {
        let err = FrontendConfig::from_toml("[session]\nmilestone = \"later\"\n")
            .expect_err("unknown milestone");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_load() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(SAMPLE.as_bytes())
            .expect("Failed to write TOML content to temporary file");

        let config = FrontendConfig::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(config.catalog.default_graph, "social");
    }

    #[test]
    fn test_load_missing_file() {
        let err = FrontendConfig::load("/nonexistent/gql-frontend.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
