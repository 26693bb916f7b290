//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::EdgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file, apply environment overrides, and
/// validate.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: EdgeConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration without a file: schema defaults plus environment
/// overrides, validated.
pub fn load_from_env() -> Result<EdgeConfig, ConfigError> {
    let mut config = EdgeConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay deployment-supplied values. Secrets are only ever read from
/// here, never from the file on disk.
fn apply_env_overrides(config: &mut EdgeConfig) {
    if let Ok(addr) = std::env::var("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Ok(url) = std::env::var("DIRECTUS_URL") {
        config.cms.base_url = url;
    }
    if let Ok(token) = std::env::var("DIRECTUS_TOKEN") {
        config.cms.token = Some(token);
    }
    if let Ok(secret) = std::env::var("REVALIDATE_SECRET") {
        config.revalidate.secret = Some(secret);
    }
    if let Ok(flag) = std::env::var("REVALIDATE_DEV_FALLBACK") {
        config.revalidate.dev_fallback = matches!(flag.as_str(), "1" | "true" | "yes");
    }
}
