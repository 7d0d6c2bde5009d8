//! Remote store HTTP client
//!
//! A thin reqwest wrapper over the managed store's namespace API. The client
//! is constructed once at startup and injected into route state; there is no
//! module-level singleton. Calls are single-shot: no retry and no in-flight
//! cancellation, the route boundary surfaces whatever comes back.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Response;

use crate::core::config::StoreConfig;
use crate::core::constants::DEFAULT_NAMESPACE_PAGE_SIZE;
use crate::query::CompiledQueryRequest;

use super::error::StoreError;
use super::types::{ListNamespacesParams, NamespaceList, NamespaceMetadata, QueryResponse};

pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if !config.api_key.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| {
                    StoreError::Config("api key contains invalid header characters".to_string())
                })?;
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .user_agent(concat!("puffboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of namespaces
    pub async fn list_namespaces(
        &self,
        params: &ListNamespacesParams,
    ) -> Result<NamespaceList, StoreError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(ref prefix) = params.prefix {
            query.push(("prefix", prefix.clone()));
        }
        if let Some(ref cursor) = params.cursor {
            query.push(("cursor", cursor.clone()));
        }
        let page_size = params.page_size.unwrap_or(DEFAULT_NAMESPACE_PAGE_SIZE);
        query.push(("page_size", page_size.to_string()));

        let response = self
            .http
            .get(format!("{}/v1/namespaces", self.base_url))
            .query(&query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch a namespace's metadata document, including its schema
    pub async fn namespace_metadata(&self, id: &str) -> Result<NamespaceMetadata, StoreError> {
        let response = self
            .http
            .get(format!("{}/v1/namespaces/{}/metadata", self.base_url, id))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Execute one compiled query against a namespace
    pub async fn query(
        &self,
        id: &str,
        request: &CompiledQueryRequest,
    ) -> Result<QueryResponse, StoreError> {
        tracing::debug!(
            namespace = %id,
            top_k = request.top_k,
            has_filters = request.filters.is_some(),
            has_rank_by = request.rank_by.is_some(),
            "Executing namespace query"
        );

        let response = self
            .http
            .post(format!("{}/v1/namespaces/{}/query", self.base_url, id))
            .json(request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Turn a non-2xx response into an API error carrying the body text
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        tracing::warn!(status = status.as_u16(), message = %message, "Store rejected request");
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
