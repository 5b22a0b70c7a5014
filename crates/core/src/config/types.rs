use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::prep::PrepItemDefinition;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
    #[serde(default)]
    pub jira: Option<JiraConfig>,
    #[serde(default)]
    pub status_check: Option<StatusCheckConfig>,
    /// Replaces the built-in prep catalog when present.
    #[serde(default)]
    pub catalog: Option<Vec<PrepItemDefinition>>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shipready.db")
}

/// Prep item tracking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadinessConfig {
    /// How often an open release view re-evaluates deadline risk (seconds).
    #[serde(default = "default_review_interval")]
    pub review_interval_secs: u64,
    /// Key of the persisted prep item record.
    #[serde(default = "default_record_key")]
    pub record_key: String,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            review_interval_secs: default_review_interval(),
            record_key: default_record_key(),
        }
    }
}

fn default_review_interval() -> u64 {
    60
}

fn default_record_key() -> String {
    "release_prep_items".to_string()
}

/// Custom ticket fields consulted by the attribute extraction fallbacks.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GroupingConfig {
    #[serde(default = "default_epic_field")]
    pub epic_field: String,
    #[serde(default = "default_service_field")]
    pub service_field: String,
    #[serde(default = "default_team_field")]
    pub team_field: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            epic_field: default_epic_field(),
            service_field: default_service_field(),
            team_field: default_team_field(),
        }
    }
}

fn default_epic_field() -> String {
    "customfield_10014".to_string()
}

fn default_service_field() -> String {
    "customfield_10050".to_string()
}

fn default_team_field() -> String {
    "customfield_10001".to_string()
}

/// Ticket system (Jira) connection used by `jira_ticket` checks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Base URL (e.g., "https://example.atlassian.net")
    pub url: String,
    /// Account used for basic auth.
    #[serde(default)]
    pub email: String,
    /// API token used for basic auth.
    #[serde(default)]
    pub api_token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_jira_timeout")]
    pub timeout_secs: u32,
    /// Maximum tickets fetched per query (default: 50)
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_jira_timeout() -> u32 {
    30
}

fn default_max_results() -> u32 {
    50
}

/// Generic status endpoint used by `api_check` checks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatusCheckConfig {
    /// Relative endpoints are resolved against this URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_status_timeout")]
    pub timeout_secs: u32,
}

fn default_status_timeout() -> u32 {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub readiness: ReadinessConfig,
    pub grouping: GroupingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira: Option<SanitizedJiraConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_check: Option<StatusCheckConfig>,
    pub custom_catalog: bool,
}

/// Sanitized Jira config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJiraConfig {
    pub url: String,
    pub email: String,
    pub api_token_configured: bool,
    pub timeout_secs: u32,
    pub max_results: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            readiness: config.readiness.clone(),
            grouping: config.grouping.clone(),
            jira: config.jira.as_ref().map(|j| SanitizedJiraConfig {
                url: j.url.clone(),
                email: j.email.clone(),
                api_token_configured: !j.api_token.is_empty(),
                timeout_secs: j.timeout_secs,
                max_results: j.max_results,
            }),
            status_check: config.status_check.clone(),
            custom_catalog: config.catalog.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prep::{CheckKind, Resolver};

    #[test]
    fn test_deserialize_with_default_server() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "shipready.db");
        assert_eq!(config.readiness.record_key, "release_prep_items");
    }

    #[test]
    fn test_deserialize_grouping_overrides() {
        let toml = r#"
[grouping]
epic_field = "customfield_20000"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.grouping.epic_field, "customfield_20000");
        assert_eq!(config.grouping.service_field, "customfield_10050");
        assert_eq!(config.grouping.team_field, "customfield_10001");
    }

    #[test]
    fn test_deserialize_custom_catalog() {
        let toml = r#"
[[catalog]]
id = "docs"
label = "Docs published"
description = "Public docs updated"
resolver_type = "manual"

[[catalog]]
id = "ci-green"
label = "CI green"
description = "Main branch pipeline passing"
resolver_type = "automated"
deadline = "2026-10-20T12:00:00Z"

[catalog.automated_check]
kind = "api_check"

[catalog.automated_check.config]
endpoint = "https://ci.example.com/status"
expected_status = "passing"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let catalog = config.catalog.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].resolver, Resolver::Manual);
        match &catalog[1].resolver {
            Resolver::Automated { automated_check } => {
                assert_eq!(automated_check.kind, CheckKind::ApiCheck);
                assert_eq!(
                    automated_check.config.expected_status.as_deref(),
                    Some("passing")
                );
            }
            other => panic!("expected automated resolver, got {:?}", other),
        }
        assert!(catalog[1].deadline.is_some());
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let config = Config {
            jira: Some(JiraConfig {
                url: "https://jira.example.com".to_string(),
                email: "bot@example.com".to_string(),
                api_token: "secret-token".to_string(),
                timeout_secs: 30,
                max_results: 50,
            }),
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let jira = sanitized.jira.as_ref().unwrap();
        assert!(jira.api_token_configured);
        assert!(!sanitized.custom_catalog);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
    }
}
