//! Web search tool
//!
//! Queries a Tavily-compatible search API. Failures never reach the agent
//! loop as errors: they are logged and reported as an absent result.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, CounselError, Result};

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Web search client
#[derive(Clone)]
pub struct WebSearch {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_results: usize,
}

impl WebSearch {
    /// Create a search client from configuration.
    ///
    /// A missing API key is not an error here; searches will simply come back empty.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = std::env::var(&config.search.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; web search will return no results",
                config.search.api_key_env
            );
        }
        Self::new(
            config.search.base_url.clone(),
            api_key,
            config.search.max_search_results,
            Duration::from_secs(config.search.timeout_secs),
        )
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        max_results: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            max_results,
        })
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Search the web. Returns `None` if the provider could not be reached or
    /// answered with an error.
    pub async fn search(&self, query: &str) -> Option<Vec<SearchResult>> {
        match self.request(query).await {
            Ok(results) => {
                tracing::debug!(query, results = results.len(), "search complete");
                Some(results)
            }
            Err(e) => {
                tracing::warn!(query, "search failed: {}", e);
                None
            }
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchResult>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CounselError::tool("no search API key configured"))?;

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key,
                query,
                max_results: self.max_results,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CounselError::tool(format!(
                "search API error ({}): {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        let mut results = parsed.results;
        results.truncate(self.max_results);
        Ok(results)
    }
}
