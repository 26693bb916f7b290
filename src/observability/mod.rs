//! Observability subsystem.
//!
//! # Responsibilities
//! - Structured logging setup (tracing)
//! - Prometheus metrics endpoint and recording helpers
//!
//! # Design Decisions
//! - JSON log format for production, pretty for development, from config
//! - Metrics recording is fire-and-forget; handlers never fail on it

pub mod logging;
pub mod metrics;
