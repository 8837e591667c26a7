use super::{InventoryQuery, QueryRequest};
use crate::config::ApiConfig;
use crate::error::{Result, SavingsError};
use crate::retry::{ExponentialBackoffPolicy, RetryPolicy};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for the serving-layer query endpoint
pub struct InventoryClient {
    client: Client,
    query_url: String,
    page_size: usize,
    retry: ExponentialBackoffPolicy,
}

impl InventoryClient {
    pub fn new(config: &ApiConfig, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", token)).map_err(|_| {
            SavingsError::Validation {
                field: "token".to_string(),
                reason: "contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            query_url: config.query_url(),
            page_size: config.page_size.max(1) as usize,
            retry: ExponentialBackoffPolicy::new(config.max_attempts),
        })
    }

    /// Replace the retry policy (tests use short delays)
    pub fn with_retry_policy(mut self, retry: ExponentialBackoffPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn page_body(&self, request: &QueryRequest, start_at: usize) -> Value {
        let mut query = json!({
            "models": request.models,
            "type": "object_set",
        });
        if let Some(filter) = &request.filter {
            query["with"] = filter.clone();
        }

        json!({
            "query": query,
            "limit": self.page_size,
            "start_at_index": start_at,
            "select": request.select,
            "get_results_and_count": false,
            "full_graph_fetch": {"enabled": true},
            "max_tier": 2,
        })
    }

    async fn post_page(&self, body: &Value) -> Result<Vec<Value>> {
        let response = self.client.post(&self.query_url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SavingsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut data: Value = response.json().await?;
        match data.get_mut("data").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl InventoryQuery for InventoryClient {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut start_at = 0;

        loop {
            let body = self.page_body(request, start_at);
            debug!(
                "POST {} models={:?} start_at={}",
                self.query_url, request.models, start_at
            );

            let items = self
                .retry
                .execute_with_retry(|| self.post_page(&body))
                .await?;
            let page_len = items.len();
            all_items.extend(items);

            if page_len < self.page_size {
                break;
            }
            start_at += self.page_size;
        }

        info!(
            "Fetched {} items for models {:?}",
            all_items.len(),
            request.models
        );
        Ok(all_items)
    }
}
