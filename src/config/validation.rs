use crate::config::types::{
    AdditionalEntry, CheckpointConfig, Config, CrawlerConfig, OutputConfig, PingConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_additional_entries(&config.additional)?;
    validate_checkpoint_config(&config.checkpoint)?;
    validate_output_config(&config.output)?;
    if let Some(ping) = &config.ping {
        validate_ping_config(ping)?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.root_url.trim().is_empty() {
        return Err(ConfigError::MissingTarget);
    }

    validate_http_url(&config.root_url, "root-url")?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.password.is_some() && config.username.is_none() {
        return Err(ConfigError::Validation(
            "password is set but username is missing".to_string(),
        ));
    }

    Ok(())
}

/// Validates additional (unlinked) sitemap entries
fn validate_additional_entries(entries: &[AdditionalEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        if !(0.0..=1.0).contains(&entry.priority) {
            return Err(ConfigError::Validation(format!(
                "priority of additional url '{}' must be between 0 and 1, got {}",
                entry.url, entry.priority
            )));
        }
    }
    Ok(())
}

/// Validates checkpoint configuration
fn validate_checkpoint_config(config: &CheckpointConfig) -> Result<(), ConfigError> {
    if config.session_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "session-name cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.database_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "database-path cannot be empty when set".to_string(),
            ));
        }
    }

    // A budget that does not outlast the margin would checkpoint before every visit
    if config.execution_budget_secs > 0
        && config.execution_budget_secs <= config.safety_margin_secs
    {
        return Err(ConfigError::Validation(format!(
            "execution-budget-secs ({}) must exceed safety-margin-secs ({})",
            config.execution_budget_secs, config.safety_margin_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.sitemap_path.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates ping configuration
fn validate_ping_config(config: &PingConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.sitemap_url, "sitemap-url")?;

    if config.placeholder.is_empty() {
        return Err(ConfigError::Validation(
            "ping placeholder cannot be empty".to_string(),
        ));
    }

    for template in &config.urls {
        if !template.contains(&config.placeholder) {
            return Err(ConfigError::Validation(format!(
                "ping url '{}' does not contain placeholder '{}'",
                template, config.placeholder
            )));
        }
    }

    Ok(())
}

/// Checks that a value parses as an absolute http(s) URL with a host
fn validate_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler(root: &str) -> CrawlerConfig {
        CrawlerConfig {
            root_url: root.to_string(),
            visit_limit: 0,
            allow_query: false,
            user_agent: "test-agent".to_string(),
            username: None,
            password: None,
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_validate_root_url() {
        assert!(validate_crawler_config(&crawler("https://example.com/")).is_ok());
        assert!(validate_crawler_config(&crawler("http://sub.example.com")).is_ok());

        assert!(matches!(
            validate_crawler_config(&crawler("  ")),
            Err(ConfigError::MissingTarget)
        ));
        assert!(matches!(
            validate_crawler_config(&crawler("ftp://example.com/")),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_crawler_config(&crawler("example.com")),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_password_requires_username() {
        let mut config = crawler("https://example.com/");
        config.password = Some("secret".to_string());
        assert!(validate_crawler_config(&config).is_err());

        config.username = Some("editor".to_string());
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_additional_priority_range() {
        let ok = vec![AdditionalEntry {
            url: "https://example.com/a".to_string(),
            priority: 1.0,
        }];
        assert!(validate_additional_entries(&ok).is_ok());

        let bad = vec![AdditionalEntry {
            url: "https://example.com/a".to_string(),
            priority: 1.5,
        }];
        assert!(validate_additional_entries(&bad).is_err());
    }

    #[test]
    fn test_budget_must_exceed_margin() {
        let mut config = CheckpointConfig::default();
        assert!(validate_checkpoint_config(&config).is_ok());

        config.execution_budget_secs = 5;
        assert!(validate_checkpoint_config(&config).is_err());

        config.execution_budget_secs = 60;
        assert!(validate_checkpoint_config(&config).is_ok());
    }

    #[test]
    fn test_ping_templates_need_placeholder() {
        let mut ping = PingConfig {
            sitemap_url: "https://example.com/sitemap.xml".to_string(),
            placeholder: "{path}".to_string(),
            urls: vec!["https://search.example.org/ping?sitemap={path}".to_string()],
        };
        assert!(validate_ping_config(&ping).is_ok());

        ping.urls.push("https://search.example.org/ping".to_string());
        assert!(validate_ping_config(&ping).is_err());
    }
}
