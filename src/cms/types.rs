//! Typed CMS records.
//!
//! Field sets mirror the Directus collections behind the site. Records are
//! deserialized leniently: editors leave fields empty, and a half-filled
//! record must not take a page down.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A service offered by the company (piling, sheet piling, drilling, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub machinery_category: Option<u64>,
}

/// A machine in the company fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machinery {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub technical_specs: Value,
    #[serde(default)]
    pub category: Option<u64>,
}

/// A completed project shown in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    /// CMS file id of the cover image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub machinery: Vec<CaseMachinery>,
}

/// Junction record linking a case to the machinery used on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMachinery {
    pub machinery_id: MachineryRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineryRef {
    pub name: String,
}

/// Site-wide settings singleton: contacts plus region-keyed hero copy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteSettings {
    pub company_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Hero content variants keyed by region code.
    pub hero: HashMap<String, HeroBlock>,
}

/// Hero copy for one region.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HeroBlock {
    pub title: String,
    pub subtitle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_case_record_deserializes() {
        let case: ProjectCase = serde_json::from_value(json!({
            "id": "17",
            "title": "Pile field, residential block",
        }))
        .unwrap();
        assert_eq!(case.id, "17");
        assert!(case.machinery.is_empty());
        assert!(case.image.is_none());
    }

    #[test]
    fn case_machinery_relation_deserializes() {
        let case: ProjectCase = serde_json::from_value(json!({
            "id": "3",
            "title": "Bridge footing",
            "machinery": [{"machinery_id": {"name": "BAUER BG 28"}}],
        }))
        .unwrap();
        assert_eq!(case.machinery[0].machinery_id.name, "BAUER BG 28");
    }

    #[test]
    fn settings_hero_is_region_keyed() {
        let settings: SiteSettings = serde_json::from_value(json!({
            "company_name": "Geotech Hub",
            "hero": {
                "spb": {"title": "Piling in St. Petersburg"},
                "msk": {"title": "Piling in Moscow", "subtitle": "Fast mobilization"},
            },
        }))
        .unwrap();
        assert_eq!(settings.hero["msk"].subtitle.as_deref(), Some("Fast mobilization"));
    }
}
