//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! service. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

use crate::geo::region::Region;

/// Fallback revalidation secret, accepted only when
/// [`RevalidateConfig::dev_fallback`] is explicitly enabled.
pub const DEV_FALLBACK_SECRET: &str = "geotech_2025_sync";

/// Root configuration for the edge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Headless CMS connection settings.
    pub cms: CmsConfig,

    /// Page cache settings.
    pub cache: CacheConfig,

    /// Geo-region personalization settings.
    pub geo: GeoConfig,

    /// Revalidation endpoint settings.
    pub revalidate: RevalidateConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Headless CMS connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Base URL of the CMS REST API.
    pub base_url: String,

    /// Static access token, sent as a Bearer header when set.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8055".to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

/// Page cache settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a cached page document stays fresh without revalidation.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

/// Geo-region personalization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Paths the region resolver intercepts. A trailing `/*` covers the
    /// whole sub-tree; anything else matches exactly.
    pub match_paths: Vec<String>,

    /// Region assigned to first-time visitors.
    pub default_region: Region,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            match_paths: vec!["/".to_string(), "/services/*".to_string()],
            default_region: Region::Spb,
        }
    }
}

/// Revalidation endpoint settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevalidateConfig {
    /// Shared secret for the revalidation webhook. Supplied via the
    /// `REVALIDATE_SECRET` environment variable; startup fails when unset
    /// unless `dev_fallback` is enabled.
    #[serde(skip_serializing)]
    pub secret: Option<String>,

    /// Accept the fixed development secret when no explicit secret is
    /// configured. Never enable in production.
    pub dev_fallback: bool,

    /// Declared path coupling: invalidating `path` also invalidates each
    /// of its `dependents` (entries containing `:` are templates).
    pub dependents: Vec<DependencyRule>,
}

impl Default for RevalidateConfig {
    fn default() -> Self {
        Self {
            secret: None,
            dev_fallback: false,
            dependents: vec![DependencyRule {
                path: "/".to_string(),
                dependents: vec!["/portfolio".to_string(), "/portfolio/:id".to_string()],
            }],
        }
    }
}

impl RevalidateConfig {
    /// The secret the endpoint compares against, or `None` when the
    /// endpoint must not be served (fail closed).
    pub fn resolved_secret(&self) -> Option<&str> {
        match &self.secret {
            Some(s) if !s.is_empty() => Some(s),
            _ if self.dev_fallback => Some(DEV_FALLBACK_SECRET),
            _ => None,
        }
    }
}

/// One entry of the path dependency table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyRule {
    /// Invalidated path that triggers the rule.
    pub path: String,

    /// Paths/templates invalidated together with it.
    pub dependents: Vec<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format: "json" or "pretty".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
