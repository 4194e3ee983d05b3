//! Search-index context provider.
//!
//! Talks to an OpenSearch/Elasticsearch-compatible `_search` endpoint. Chunks
//! of a chapter are stored as separate documents; the provider pulls them in
//! page order and concatenates their text.
//!
//! Two round trips per fetch:
//! 1. A terms aggregation over `toc_level_2_title` decides which metadata key
//!    holds chapter names (some books put chapters one level up).
//! 2. A term query on that key returns the chunks.

use async_trait::async_trait;
use quizgen_config::SearchConfig;
use quizgen_core::context::{ContextProvider, SharedContext};
use quizgen_core::error::ContextError;
use quizgen_core::request::ObjectiveFilter;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::ContextLimits;

const METADATA_PREFIX: &str = "metadata.source.metadata";
const LEVEL_2_KEY: &str = "toc_level_2_title";
const LEVEL_1_KEY: &str = "toc_level_1_title";
const CHAPTER_BUCKETS: usize = 200;

/// Thin HTTP client for one search index.
///
/// Wraps a single `reqwest::Client` (connection pool included). Build it once
/// at startup and share it; cloning is cheap.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    search_url: String,
    api_key: Option<String>,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, ContextError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ContextError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            search_url: format!(
                "{}/{}/_search",
                config.endpoint.trim_end_matches('/'),
                config.index
            ),
            api_key: config.api_key.clone(),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// POST a query body to `_search` and return the decoded response.
    pub async fn search(&self, body: &Value) -> Result<SearchResponse, ContextError> {
        let mut req = self.http.post(&self.search_url).json(body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("ApiKey {key}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ContextError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ContextError::Transport(format!("HTTP {status}: {text}")));
        }

        resp.json::<SearchResponse>()
            .await
            .map_err(|e| ContextError::Decode(e.to_string()))
    }
}

// --- Response shapes (only the fields we read) ---

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Hits,
    #[serde(default)]
    pub aggregations: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl SearchResponse {
    /// Concatenate `_source.value` of every hit, in hit order.
    pub fn chunk_text(&self) -> String {
        self.hits
            .hits
            .iter()
            .filter_map(|h| h.source.get("value").and_then(Value::as_str))
            .collect()
    }

    /// Bucket keys of a named terms aggregation.
    pub fn bucket_keys(&self, agg: &str) -> Vec<String> {
        self.aggregations
            .as_ref()
            .and_then(|a| a.get(agg))
            .and_then(|a| a.get("buckets"))
            .and_then(Value::as_array)
            .map(|buckets| {
                buckets
                    .iter()
                    .filter_map(|b| b.get("key").and_then(Value::as_str).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Context provider backed by [`SearchClient`].
pub struct SearchContextProvider {
    client: SearchClient,
    max_chunks: usize,
    detect_chapter_key: bool,
    limits: ContextLimits,
}

impl SearchContextProvider {
    pub fn new(client: SearchClient, config: &SearchConfig, limits: ContextLimits) -> Self {
        Self {
            client,
            max_chunks: config.max_chunks,
            detect_chapter_key: config.detect_chapter_key,
            limits,
        }
    }

    /// Pick the metadata key that holds chapter names.
    async fn chapter_key(&self) -> Result<&'static str, ContextError> {
        if !self.detect_chapter_key {
            return Ok(LEVEL_2_KEY);
        }

        let resp = self.client.search(&chapter_names_query(LEVEL_2_KEY)).await?;
        let keys = resp.bucket_keys("chapter_names");
        let key = if keys.iter().any(|k| k.to_lowercase().contains("chapter")) {
            LEVEL_2_KEY
        } else {
            LEVEL_1_KEY
        };
        debug!(buckets = keys.len(), key, "Detected chapter key");
        Ok(key)
    }
}

/// Terms aggregation listing the distinct values of a TOC metadata key.
pub fn chapter_names_query(key: &str) -> Value {
    json!({
        "size": 0,
        "aggs": {
            "chapter_names": {
                "terms": {
                    "field": format!("{METADATA_PREFIX}.{key}.keyword"),
                    "size": CHAPTER_BUCKETS
                }
            }
        }
    })
}

/// Chunks of one chapter in reading order, without embeddings.
pub fn chapter_chunks_query(key: &str, locator: &str, max_chunks: usize) -> Value {
    json!({
        "query": {
            "term": {
                format!("{METADATA_PREFIX}.{key}.keyword"): locator
            }
        },
        "sort": [
            { format!("{METADATA_PREFIX}.pdf_page_number"): "asc" },
            { format!("{METADATA_PREFIX}.page_sequence"): "asc" }
        ],
        "_source": { "excludes": ["embedding"] },
        "size": max_chunks
    })
}

#[async_trait]
impl ContextProvider for SearchContextProvider {
    fn name(&self) -> &str {
        "search"
    }

    async fn fetch(
        &self,
        locator: &str,
        objectives: Option<&ObjectiveFilter>,
    ) -> Result<SharedContext, ContextError> {
        crate::check_locator(locator)?;
        if let Some(objectives) = objectives {
            // The index has no objective metadata; the filter only travels
            // to the synthesizer.
            debug!(objectives = ?objectives.values(), "Objective filter not applied to search");
        }

        let key = self.chapter_key().await?;
        let resp = self
            .client
            .search(&chapter_chunks_query(key, locator, self.max_chunks))
            .await?;

        let text = resp.chunk_text();
        info!(
            locator,
            chunks = resp.hits.hits.len(),
            chars = text.chars().count(),
            "Retrieved chapter content"
        );

        self.limits.bound(locator, &text)
    }
}
