//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: secrets, CMS connection)
//!     → validation.rs (semantic checks, fail-closed secret rule)
//!     → EdgeConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so a bare deployment only needs env vars
//! - Secrets come from the environment, never the config file on disk
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::EdgeConfig;
pub use schema::DependencyRule;
pub use schema::GeoConfig;
pub use schema::RevalidateConfig;
