//! Configuration management for relgraph services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Conventional variables: `NEO4J_URI`, `NEO4J_USERNAME`, `NEO4J_PASSWORD`, `API_TOKEN`
//! 2. Environment variables (`RELGRAPH__` prefix, `__` separator)
//! 3. Config file (`relgraph.toml`)
//! 4. Defaults

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::RelgraphError;

/// Top-level service configuration.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub neo4j: Neo4jSettings,
    pub server: ServerSettings,
}

/// Connection settings for the Neo4j engine.
#[derive(Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// HTTP facade settings.
#[derive(Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Static bearer token guarding create and delete.
    #[serde(default)]
    pub api_token: String,

    /// Origins allowed by CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Labels accepted on create. Empty accepts any valid label.
    #[serde(default)]
    pub allowed_labels: Vec<String>,
}

/// Conventional variable names mapped onto config keys.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("NEO4J_URI", "neo4j.uri"),
    ("NEO4J_USERNAME", "neo4j.user"),
    ("NEO4J_PASSWORD", "neo4j.password"),
    ("API_TOKEN", "server.api_token"),
];

impl AppConfig {
    /// Load configuration from the process environment and the optional
    /// config file `<file_prefix>.toml`.
    pub fn load(file_prefix: &str) -> Result<Self, RelgraphError> {
        Self::load_from(file_prefix, std::env::vars().collect())
    }

    /// Load configuration from an explicit variable set.
    pub fn load_from(
        file_prefix: &str,
        vars: HashMap<String, String>,
    ) -> Result<Self, RelgraphError> {
        let mut builder = config::Config::builder()
            .set_default("neo4j.uri", default_uri())?
            .set_default("server.bind", default_bind())?
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("RELGRAPH")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("server.allowed_labels")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in ENV_OVERRIDES {
            let value = vars.get(*var).filter(|v| !v.is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        let cfg: AppConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fail fast on missing credentials or token.
    pub fn validate(&self) -> Result<(), RelgraphError> {
        let missing: Vec<&str> = [
            ("NEO4J_USERNAME", self.neo4j.user.as_str()),
            ("NEO4J_PASSWORD", self.neo4j.password.as_str()),
            ("API_TOKEN", self.server.api_token.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(RelgraphError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("fetch_size", &self.fetch_size)
            .finish()
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind", &self.bind)
            .field("api_token", &"<redacted>")
            .field("cors_origins", &self.cors_origins)
            .field("allowed_labels", &self.allowed_labels)
            .finish()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("neo4j", &self.neo4j)
            .field("server", &self.server)
            .finish()
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}
