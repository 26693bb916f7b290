//! Region resolution logic.
//!
//! # Responsibilities
//! - Decide, from request state alone, whether a region cookie write is needed
//! - Keep the decision deterministic and free of I/O
//!
//! # Design Decisions
//! - Returns the cookie write as data; the caller applies it to the response
//! - Existing cookie values are never overwritten implicitly, even when the
//!   value is outside the recognized set

use crate::geo::region::Region;

/// Decide which region cookie, if any, to set on the outgoing response.
///
/// * `geo_query` - value of the `geo` query parameter, if present
/// * `existing_cookie` - raw value of the region cookie on the request
/// * `default_region` - region assigned to first-time visitors
///
/// An explicit recognized override always wins. Otherwise an existing
/// cookie (any value) is left untouched, and a missing cookie gets the
/// default exactly once.
pub fn resolve(
    geo_query: Option<&str>,
    existing_cookie: Option<&str>,
    default_region: Region,
) -> Option<Region> {
    if let Some(region) = geo_query.and_then(Region::parse) {
        return Some(region);
    }
    match existing_cookie {
        Some(_) => None,
        None => Some(default_region),
    }
}
