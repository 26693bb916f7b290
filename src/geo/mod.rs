//! Geo-region personalization subsystem.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → middleware.rs (path allow-list check)
//!     → resolver.rs (pure decision: query param + cookie → cookie write)
//!     → region.rs (region codes)
//!     → Set-Cookie appended to the pass-through response
//! ```
//!
//! # Design Decisions
//! - The decision is a pure function; the axum middleware is a thin adapter
//! - An explicit `?geo=` override always wins over an existing cookie
//! - Unrecognized values are ignored, never an error
//! - Requests outside the allow-list are not touched at all

pub mod middleware;
pub mod region;
pub mod resolver;

pub use middleware::{geo_middleware, GeoPolicy};
pub use region::{Region, GEO_COOKIE, GEO_QUERY_PARAM};
