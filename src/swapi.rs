//! Read-only client for a SWAPI-compatible catalog.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_PAGES: usize = 100;

#[derive(Debug, Error)]
pub enum SwapiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Catalog collections the populate jobs read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    People,
    Planets,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Planets => "planets",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Page {
    next: Option<String>,
    #[serde(default)]
    results: Vec<ResourceRef>,
}

/// One row of a listing page; `url` points at the full document.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SwapiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SwapiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SwapiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SwapiError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Walks every listing page of `resource` by following `next` links.
    #[instrument(skip(self))]
    pub async fn list(&self, resource: Resource) -> Result<Vec<ResourceRef>, SwapiError> {
        let mut refs = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(format!("{}/{}/", self.base_url, resource.path()));

        while let Some(url) = next.take() {
            if visited.len() >= MAX_PAGES || !visited.insert(url.clone()) {
                debug!(url = %url, "Stopping pagination");
                break;
            }

            let page: Page = self.get_json(&url).await?;
            debug!(url = %url, results = page.results.len(), "Fetched listing page");
            refs.extend(page.results);
            next = page.next.map(|link| self.resolve(&link));
        }

        Ok(refs)
    }

    /// Fetches one full resource document.
    #[instrument(skip(self))]
    pub async fn fetch_document(&self, url: &str) -> Result<Value, SwapiError> {
        self.get_json(&self.resolve(url)).await
    }

    fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}/{}", self.base_url, link.trim_start_matches('/'))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SwapiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| SwapiError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwapiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| SwapiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
