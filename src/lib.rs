//! Edge service for the Geotech Hub website.
//!
//! Serves CMS-backed page documents with geo-region personalization and
//! webhook-driven cache revalidation.

pub mod cache;
pub mod cms;
pub mod config;
pub mod geo;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
