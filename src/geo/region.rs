//! Region codes served by the site.

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the visitor's region.
pub const GEO_COOKIE: &str = "x-geo-region";

/// Query parameter accepted as an explicit region override.
pub const GEO_QUERY_PARAM: &str = "geo";

/// A site region. Content variants (hero copy, contact details) are keyed
/// by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Moscow.
    Msk,
    /// St. Petersburg.
    Spb,
}

impl Region {
    /// Parse a region code. Returns `None` for anything outside the
    /// recognized set; callers treat that as "no override".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "msk" => Some(Region::Msk),
            "spb" => Some(Region::Spb),
            _ => None,
        }
    }

    /// The wire form used in cookies, query params, and CMS field keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Msk => "msk",
            Region::Spb => "spb",
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::Spb
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
