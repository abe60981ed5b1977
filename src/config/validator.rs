//! Config validation.

use crate::config::AppConfig;
use crate::error::ConfigError;
use std::net::SocketAddr;

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .bind_addr
        .parse::<SocketAddr>()
        .map_err(|_| ConfigError::Validation(format!("bind address '{}' is not host:port", config.bind_addr)))?;
    if config.permission_prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "permission prefix '{}' must not contain whitespace",
            config.permission_prefix
        )));
    }
    if config.body_limit == 0 {
        return Err(ConfigError::Validation("body limit must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_prefix_and_limit() {
        let config = AppConfig { permission_prefix: "My App.".into(), ..AppConfig::default() };
        assert!(validate(&config).is_err());
        let config = AppConfig { body_limit: 0, ..AppConfig::default() };
        assert!(validate(&config).is_err());
    }
}
