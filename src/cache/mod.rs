//! Page caching subsystem.
//!
//! # Data Flow
//! ```text
//! page handler
//!     → page_cache.rs (get: fresh hit or miss)
//!     → [miss: CMS fetch, put]
//!
//! revalidation endpoint
//!     → invalidation.rs (dependency table lookup)
//!     → page_cache.rs (invalidate exact / by template)
//!     → next page request refetches from the CMS
//! ```
//!
//! # Design Decisions
//! - Entries expire on a TTL even without explicit invalidation
//! - Invalidating an absent entry is a no-op, safe to repeat
//! - Path coupling lives in a declared dependency table, not inline code

pub mod invalidation;
pub mod page_cache;

pub use invalidation::{DependencyTable, InvalidateError, Invalidator};
pub use page_cache::PageCache;
