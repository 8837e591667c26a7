//! Inventory API access
//!
//! [`InventoryQuery`] is the seam between the report pipeline and the
//! serving-layer API: [`InventoryClient`] implements it over HTTP, and the
//! fetchers in [`fetch`] turn raw query items into typed models.

mod client;
pub mod fetch;

pub use client::InventoryClient;
pub use fetch::{fetch_inventory, list_assets, list_subscription_configs};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One object-set query, before pagination
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub models: Vec<String>,
    pub select: Vec<String>,
    /// Optional `with` filter for the object set
    pub filter: Option<Value>,
}

impl QueryRequest {
    pub fn new(model: &str, select: &[&str]) -> Self {
        Self {
            models: vec![model.to_string()],
            select: select.iter().map(|s| s.to_string()).collect(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Runs a query and returns every item across all pages
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<Value>>;
}
