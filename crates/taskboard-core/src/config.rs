//! Startup Configuration
//!
//! The host page supplies backend credentials, the application id and an
//! optional auth token. They are read once into `AppConfig` and passed
//! explicitly from then on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{BoardError, CollectionPath};

/// Application id used when the host does not provide one
pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Connection settings for the hosted backend (camelCase on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    pub api_key: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl BackendConfig {
    /// Parse the host-provided JSON document
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: BackendConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidBackendConfig(e.to_string()))?;
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("apiKey"));
        }
        if config.project_id.trim().is_empty() {
            return Err(ConfigError::MissingField("projectId"));
        }
        Ok(config)
    }
}

/// Everything the board needs at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendConfig,
    /// Tenant scoping the shared collection
    pub app_id: String,
    /// Token for custom sign-in; never empty when present
    pub initial_auth_token: Option<String>,
}

impl AppConfig {
    /// Build from the raw host values.
    ///
    /// A missing app id falls back to [`DEFAULT_APP_ID`]; an empty token is
    /// treated as no token.
    pub fn from_host(
        backend_json: Option<&str>,
        app_id: Option<&str>,
        initial_auth_token: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let raw = backend_json
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(ConfigError::MissingBackendConfig)?;
        let backend = BackendConfig::from_json(raw)?;

        let app_id = app_id.unwrap_or(DEFAULT_APP_ID);
        if app_id.is_empty() || app_id.contains('/') {
            return Err(ConfigError::InvalidAppId(app_id.to_string()));
        }

        Ok(Self {
            backend,
            app_id: app_id.to_string(),
            initial_auth_token: initial_auth_token
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        })
    }

    pub fn collection_path(&self) -> CollectionPath {
        CollectionPath::for_app(&self.app_id)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingBackendConfig,
    InvalidBackendConfig(String),
    MissingField(&'static str),
    InvalidAppId(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBackendConfig => write!(f, "No backend configuration supplied"),
            ConfigError::InvalidBackendConfig(msg) => write!(f, "Invalid backend configuration: {}", msg),
            ConfigError::MissingField(field) => write!(f, "Backend configuration is missing {}", field),
            ConfigError::InvalidAppId(id) => write!(f, "Invalid application id: {:?}", id),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for BoardError {
    fn from(e: ConfigError) -> Self {
        BoardError::Initialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND: &str = r#"{"apiKey":"k-123","projectId":"tasks-demo","authDomain":"tasks-demo.example.com"}"#;

    #[test]
    fn test_from_host_full() {
        let config = AppConfig::from_host(Some(BACKEND), Some("team-a"), Some("tok")).unwrap();
        assert_eq!(config.backend.api_key, "k-123");
        assert_eq!(config.backend.auth_domain.as_deref(), Some("tasks-demo.example.com"));
        assert_eq!(config.app_id, "team-a");
        assert_eq!(config.initial_auth_token.as_deref(), Some("tok"));
        assert_eq!(config.collection_path().as_str(), "artifacts/team-a/public/data/tasks");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_host(Some(BACKEND), None, Some("")).unwrap();
        assert_eq!(config.app_id, DEFAULT_APP_ID);
        assert!(config.initial_auth_token.is_none());
    }

    #[test]
    fn test_missing_backend_config() {
        assert_eq!(
            AppConfig::from_host(None, None, None).unwrap_err(),
            ConfigError::MissingBackendConfig
        );
        assert_eq!(
            AppConfig::from_host(Some("  "), None, None).unwrap_err(),
            ConfigError::MissingBackendConfig
        );
    }

    #[test]
    fn test_required_fields() {
        let err = AppConfig::from_host(Some(r#"{"apiKey":"","projectId":"p"}"#), None, None).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("apiKey"));

        let err = AppConfig::from_host(Some(r#"{"apiKey":"k"}"#), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBackendConfig(_)));
    }

    #[test]
    fn test_app_id_cannot_escape_namespace() {
        let err = AppConfig::from_host(Some(BACKEND), Some("a/b"), None).unwrap_err();
        assert_eq!(err, ConfigError::InvalidAppId("a/b".to_string()));
    }

    #[test]
    fn test_config_error_becomes_initialization_failure() {
        let err: BoardError = ConfigError::MissingBackendConfig.into();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_backend_config_omits_absent_fields() {
        let config = BackendConfig::from_json(r#"{"apiKey":"k","projectId":"p"}"#).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({ "apiKey": "k", "projectId": "p" }));
    }
}
