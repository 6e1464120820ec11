
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::{KnowledgeError, Result};

const TAVILY_API_BASE: &str = "https://api.tavily.com";
const REQUEST_TIMEOUT_SECONDS: u64 = 5;
const MAX_RESULTS: usize = 5;

/// One result from a live web search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebSearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Blocking client for the Tavily search API. Built even when no API key
/// is configured; calls then fail with a clear message instead of at
/// startup.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    base_url: Url,
    api_key: Option<String>,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilyClient {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(TAVILY_API_BASE)
            .map_err(|e| KnowledgeError::Search(format!("invalid API base URL: {e}")))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key: config.tavily_api_key.clone(),
            agent,
        })
    }

    /// Point the client at a different API host. Used by tests to target a
    /// mock server.
    #[inline]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a basic-depth web search, returning up to five results.
    pub fn search(&self, query: &str) -> Result<Vec<WebSearchHit>> {
        let Some(api_key) = &self.api_key else {
            return Err(KnowledgeError::Search(
                "web search is not configured: set TAVILY_API_KEY".to_string(),
            ));
        };

        debug!("Web search for '{}'", query);

        let url = self
            .base_url
            .join("/search")
            .map_err(|e| KnowledgeError::Search(format!("failed to build search URL: {e}")))?;

        let request = SearchRequest {
            api_key,
            query,
            search_depth: "basic",
            max_results: MAX_RESULTS,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| KnowledgeError::Search(format!("failed to serialize request: {e}")))?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| KnowledgeError::Search(format!("web search request failed: {e}")))?;

        let response: SearchResponse = serde_json::from_str(&response_text)
            .map_err(|e| KnowledgeError::Search(format!("failed to parse response: {e}")))?;

        let hits = response
            .results
            .into_iter()
            .take(MAX_RESULTS)
            .map(|r| WebSearchHit {
                title: r.title.trim().to_string(),
                url: r.url,
                snippet: r.content.trim().to_string(),
            })
            .collect();

        Ok(hits)
    }
}
