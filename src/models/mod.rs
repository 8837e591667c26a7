//! Inventory entities parsed from serving-layer query results
//!
//! Query items look like:
//!
//! ```json
//! {
//!   "id": "...", "name": "...", "type": "...",
//!   "data": {
//!     "Name": {"value": "my-vm"},
//!     "CloudAccount": {"name": "EA-Prod", "CloudProvider": "azure"},
//!     "AssetUniqueId": {"value": "..."}
//!   }
//! }
//! ```
//!
//! Most fields under `data` are value-wrapped (`{"value": ...}`); the
//! `CloudAccount` object is not. Parsing never fails: missing or mistyped
//! fields fall back to empty strings or documented defaults.

mod asset;
mod subscription;

pub use asset::{Asset, AssetKind, Inventory, DEFAULT_VCPUS};
pub use subscription::{SubscriptionSecurityConfig, STANDARD_TIER};

use serde_json::Value;

/// `item.data`, or `Value::Null` when absent
fn data_of(item: &Value) -> &Value {
    item.get("data").unwrap_or(&Value::Null)
}

/// `data.<field>.value`
fn wrapped<'a>(data: &'a Value, field: &str) -> Option<&'a Value> {
    data.get(field).and_then(|v| v.get("value"))
}

/// `data.<field>.value` as a string, falling back to `item.<fallback>`
fn wrapped_str_or(item: &Value, field: &str, fallback: &str) -> String {
    wrapped(data_of(item), field)
        .and_then(Value::as_str)
        .or_else(|| item.get(fallback).and_then(Value::as_str))
        .unwrap_or("")
        .to_string()
}

/// `data.CloudAccount.name`; empty unless `CloudAccount` is an object
fn cloud_account_name(item: &Value) -> String {
    data_of(item)
        .get("CloudAccount")
        .and_then(Value::as_object)
        .and_then(|account| account.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
