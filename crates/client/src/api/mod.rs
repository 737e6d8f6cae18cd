//! REST client for the Souk backend.
//!
//! Uses `reqwest` for HTTP and `serde_json` for bodies. Catalog listings
//! (stores, categories, products) are cached with `moka` for the configured
//! TTL; orders and profiles are never cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use souk_client::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?)?;
//!
//! let stores = client.stores().await?;
//! let categories = client.categories(&stores[0].id).await?;
//! let products = client.products(&stores[0].id, &categories[0].id).await?;
//! ```

mod cache;
mod catalog;
mod orders;
mod profile;

use std::sync::{Arc, PoisonError, RwLock};

use moka::future::Cache;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

use cache::{CacheKey, CacheValue};

pub use orders::REQUEST_ID_HEADER;

/// Longest slice of a response body written to the log.
const LOG_BODY_LIMIT: usize = 500;
/// Longest slice of a response body carried in an error message.
const ERROR_BODY_LIMIT: usize = 200;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Souk REST backend.
///
/// Cheaply cloneable; clones share the HTTP connection pool, the bearer
/// token and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let cache = Cache::builder()
            .max_capacity(config.catalog_cache_capacity)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                token: RwLock::new(config.api_token.clone()),
                cache,
            }),
        })
    }

    /// Set or clear the bearer token sent with every request.
    pub fn set_auth_token(&self, token: Option<SecretString>) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Whether requests currently carry a bearer token.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop all cached catalog listings.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/");
        Ok(self.inner.base_url.join(&path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match token.as_ref() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// `GET` a JSON document.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = self.inner.client.get(url.clone());
        self.send(request, &url).await
    }

    /// Send a request and decode the JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T> {
        let response = self
            .authorize(request)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized(truncate(&body, ERROR_BODY_LIMIT)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %truncate(&body, LOG_BODY_LIMIT),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %truncate(&body, LOG_BODY_LIMIT),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn truncate(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}
