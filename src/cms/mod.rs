//! Headless CMS integration subsystem.
//!
//! # Data Flow
//! ```text
//! page handler
//!     → client.rs (ContentFetcher trait → Directus REST API)
//!     → {"data": ...} envelope unwrap
//!     → types.rs (typed records for page assembly)
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the `ContentFetcher` trait, not the HTTP client,
//!   so page assembly is testable without a CMS
//! - Errors are typed; the fallback-to-empty policy lives with the caller

pub mod client;
pub mod types;

pub use client::{CmsError, ContentFetcher, DirectusClient, ListQuery};
