//! ABI library fetched from the backend REST API

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::abi::{AbiLibrary, AbiRecord};

const ABI_LIST_PATH: &str = "/api/v1/abi/list";

/// Backend response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AbiListData {
    #[serde(default)]
    abis: Vec<AbiRecord>,
}

/// Client for the ABI list endpoint with an in-memory cache
pub struct AbiApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<RwLock<Option<AbiLibrary>>>,
}

impl AbiApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_http(http, base_url))
    }

    /// Use a preconfigured HTTP client
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn list_url(&self) -> String {
        format!("{}{}", self.base_url, ABI_LIST_PATH)
    }

    /// Fetch the ABI list, serving repeated calls from the cache
    pub async fn list_abis(&self) -> Result<AbiLibrary> {
        {
            let cache = self.cache.read().await;
            if let Some(library) = cache.as_ref() {
                return Ok(library.clone());
            }
        }

        let library = self.fetch_abis().await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(library.clone());
        }

        Ok(library)
    }

    /// Drop the cached list so the next call refetches
    pub async fn invalidate(&self) {
        self.cache.write().await.take();
    }

    async fn fetch_abis(&self) -> Result<AbiLibrary> {
        let url = self.list_url();
        tracing::debug!(%url, "fetching ABI list");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to query ABI list")?;

        if !response.status().is_success() {
            bail!("ABI list request failed with status {}", response.status());
        }

        let body: ApiResponse<AbiListData> = response
            .json()
            .await
            .context("Failed to parse ABI list response")?;

        parse_list(body)
    }
}

fn parse_list(body: ApiResponse<AbiListData>) -> Result<AbiLibrary> {
    if !body.success {
        let message = body.error.map(|e| e.message).unwrap_or_default();
        bail!("ABI list request rejected: {message}");
    }
    let records = body.data.map(|data| data.abis).unwrap_or_default();
    Ok(AbiLibrary::from_records(records))
}
