//! Directus REST client.
//!
//! # Responsibilities
//! - Fetch collection records, single records, and singletons
//! - Unwrap the `{"data": ...}` response envelope
//! - Attach static-token auth and build asset URLs
//!
//! # Design Decisions
//! - Trait methods return raw JSON values; typed decoding happens at the
//!   call site where the record shape is known
//! - No retries here: the page cache absorbs transient CMS failures

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::schema::CmsConfig;

/// Error type for CMS fetches.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("invalid CMS base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("CMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS responded with {status} for {resource}")]
    Status { status: u16, resource: String },

    #[error("CMS response decode failed for {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Query options for collection fetches.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub fields: Vec<String>,
    pub sort: Vec<String>,
    pub limit: Option<u32>,
    pub filter: Option<Value>,
}

impl ListQuery {
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Encode as Directus query pairs.
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.join(",")));
        }
        if !self.sort.is_empty() {
            pairs.push(("sort", self.sort.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.to_string()));
        }
        pairs
    }
}

/// Seam for fetching content records.
///
/// Returns raw JSON so the trait stays object-safe; handlers decode into
/// the types they need.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch records of a collection.
    async fn fetch_items(&self, collection: &str, query: &ListQuery) -> Result<Vec<Value>, CmsError>;

    /// Fetch one record by primary key.
    async fn fetch_item(&self, collection: &str, id: &str, query: &ListQuery) -> Result<Value, CmsError>;

    /// Fetch a single-record collection (site settings and the like).
    async fn fetch_singleton(&self, collection: &str, query: &ListQuery) -> Result<Option<Value>, CmsError>;

    /// Public URL for a file uploaded through the CMS.
    fn asset_url(&self, file_id: &str) -> String;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Production fetcher speaking the Directus REST API.
#[derive(Clone)]
pub struct DirectusClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DirectusClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        // Parse to reject malformed URLs early; requests are built by
        // string concatenation against the normalized base.
        Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    async fn get_json(&self, url: String, query: &ListQuery, resource: &str) -> Result<Value, CmsError> {
        let mut request = self.http.get(&url).query(&query.to_pairs());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
                resource: resource.to_string(),
            });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }

    fn unwrap_envelope(body: Value, resource: &str) -> Result<Value, CmsError> {
        serde_json::from_value::<Envelope<Value>>(body)
            .map(|e| e.data)
            .map_err(|source| CmsError::Decode {
                resource: resource.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ContentFetcher for DirectusClient {
    async fn fetch_items(&self, collection: &str, query: &ListQuery) -> Result<Vec<Value>, CmsError> {
        let url = format!("{}/items/{}", self.base_url, collection);
        let body = self.get_json(url, query, collection).await?;
        let data = Self::unwrap_envelope(body, collection)?;
        if data.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(data).map_err(|source| CmsError::Decode {
            resource: collection.to_string(),
            source,
        })
    }

    async fn fetch_item(&self, collection: &str, id: &str, query: &ListQuery) -> Result<Value, CmsError> {
        let resource = format!("{}/{}", collection, id);
        let url = format!("{}/items/{}/{}", self.base_url, collection, id);
        let body = self.get_json(url, query, &resource).await?;
        Self::unwrap_envelope(body, &resource)
    }

    async fn fetch_singleton(&self, collection: &str, query: &ListQuery) -> Result<Option<Value>, CmsError> {
        let url = format!("{}/items/{}", self.base_url, collection);
        let body = self.get_json(url, query, collection).await?;
        let data = Self::unwrap_envelope(body, collection)?;
        Ok(match data {
            Value::Null => None,
            other => Some(other),
        })
    }

    fn asset_url(&self, file_id: &str) -> String {
        format!("{}/assets/{}", self.base_url, file_id)
    }
}
