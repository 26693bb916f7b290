//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce the fail-closed secret rule for the revalidation endpoint
//! - Validate value ranges and path shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::EdgeConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a valid socket address: {:?}", config.listener.bind_address),
        ));
    }

    match Url::parse(&config.cms.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "cms.base_url",
            format!("unsupported scheme {:?}", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("cms.base_url", e.to_string())),
    }

    if config.cms.timeout_secs == 0 {
        errors.push(ValidationError::new("cms.timeout_secs", "must be greater than zero"));
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::new("cache.ttl_secs", "must be greater than zero"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }

    if config.geo.match_paths.is_empty() {
        errors.push(ValidationError::new("geo.match_paths", "at least one path is required"));
    }
    for path in &config.geo.match_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "geo.match_paths",
                format!("{:?} must start with '/'", path),
            ));
        }
    }

    // Fail closed: without a usable secret the revalidation endpoint must
    // not come up at all.
    if config.revalidate.resolved_secret().is_none() {
        errors.push(ValidationError::new(
            "revalidate.secret",
            "no secret configured; set REVALIDATE_SECRET (or enable dev_fallback for local development)",
        ));
    }

    for rule in &config.revalidate.dependents {
        if !rule.path.starts_with('/') {
            errors.push(ValidationError::new(
                "revalidate.dependents",
                format!("rule path {:?} must start with '/'", rule.path),
            ));
        }
        for dependent in &rule.dependents {
            if !dependent.starts_with('/') {
                errors.push(ValidationError::new(
                    "revalidate.dependents",
                    format!("dependent {:?} must start with '/'", dependent),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
