use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Review interval is positive
/// - Grouping custom fields are named
/// - Collaborator URLs are http(s)
/// - Custom catalog ids are unique and automated items carry a check
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.readiness.review_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "readiness.review_interval_secs must be greater than 0".to_string(),
        ));
    }

    if config.readiness.record_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "readiness.record_key cannot be empty".to_string(),
        ));
    }

    let grouping = &config.grouping;
    for (name, value) in [
        ("epic_field", &grouping.epic_field),
        ("service_field", &grouping.service_field),
        ("team_field", &grouping.team_field),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "grouping.{} cannot be empty",
                name
            )));
        }
    }

    if let Some(jira) = &config.jira {
        check_url("jira.url", &jira.url)?;
    }

    if let Some(base_url) = config.status_check.as_ref().and_then(|s| s.base_url.as_ref()) {
        check_url("status_check.base_url", base_url)?;
    }

    if let Some(catalog) = &config.catalog {
        if catalog.is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog must contain at least one item when present".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for def in catalog {
            if def.id.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "catalog item id cannot be empty".to_string(),
                ));
            }
            if !seen.insert(def.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate catalog item id: {}",
                    def.id
                )));
            }
        }
    }

    Ok(())
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must start with http:// or https://",
            field
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JiraConfig, ServerConfig};
    use crate::prep::{PrepItemDefinition, Resolver};

    fn manual_def(id: &str) -> PrepItemDefinition {
        PrepItemDefinition {
            id: id.to_string(),
            label: id.to_string(),
            description: String::new(),
            resolver: Resolver::Manual,
            deadline: None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = Config::default();
        config.readiness.review_interval_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_grouping_field_fails() {
        let mut config = Config::default();
        config.grouping.service_field = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("service_field"));
    }

    #[test]
    fn test_validate_jira_url_scheme() {
        let config = Config {
            jira: Some(JiraConfig {
                url: "jira.example.com".to_string(),
                email: String::new(),
                api_token: String::new(),
                timeout_secs: 30,
                max_results: 50,
            }),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_duplicate_catalog_ids() {
        let config = Config {
            catalog: Some(vec![manual_def("a"), manual_def("b"), manual_def("a")]),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate catalog item id: a"));
    }
}
