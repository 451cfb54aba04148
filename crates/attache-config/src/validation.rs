// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and a non-zero retry ceiling.

use crate::diagnostic::ConfigError;
use crate::model::AttacheConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AttacheConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if !config.server.webhook_path.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.webhook_path must start with `/`, got `{}`",
                config.server.webhook_path
            ),
        });
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    if config.upload.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "upload.max_attempts must be at least 1".to_string(),
        });
    }

    // The channel needs both credentials or neither; one without the other
    // is almost certainly a deployment mistake.
    if config.line.channel_secret.is_some() != config.line.access_token.is_some() {
        errors.push(ConfigError::Validation {
            message: "line.channel_secret and line.access_token must be set together".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AttacheConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_retry_ceiling_is_rejected() {
        let mut config = AttacheConfig::default();
        config.upload.max_attempts = 0;
        let errors = validate_config(&config).expect_err("should reject");
        assert!(errors.iter().any(|e| e.to_string().contains("max_attempts")));
    }

    #[test]
    fn webhook_path_must_be_absolute() {
        let mut config = AttacheConfig::default();
        config.server.webhook_path = "callback".to_string();
        let errors = validate_config(&config).expect_err("should reject");
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("webhook_path"))
        );
    }

    #[test]
    fn line_credentials_must_be_set_together() {
        let mut config = AttacheConfig::default();
        config.line.channel_secret = Some("secret".to_string());
        let errors = validate_config(&config).expect_err("should reject");
        assert!(errors.iter().any(|e| e.to_string().contains("together")));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = AttacheConfig::default();
        config.server.host = String::new();
        config.storage.data_dir = "  ".to_string();
        config.upload.max_attempts = 0;
        let errors = validate_config(&config).expect_err("should reject");
        assert_eq!(errors.len(), 3);
    }
}
