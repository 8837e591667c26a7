use super::{cloud_account_name, data_of, wrapped, wrapped_str_or};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// The only tier value that is billed
pub const STANDARD_TIER: &str = "Standard";

/// Defender for Cloud plan configuration of one Azure subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSecurityConfig {
    pub name: String,
    pub cloud_account_name: String,
    pub subscription_id: String,
    /// `(module_id, tier)` pairs in the order the API returned them
    pub services_pricing: Vec<(String, String)>,
}

impl SubscriptionSecurityConfig {
    pub fn new(
        cloud_account_name: impl Into<String>,
        services_pricing: Vec<(String, String)>,
    ) -> Self {
        Self {
            name: "DefenderForCloud".to_string(),
            cloud_account_name: cloud_account_name.into(),
            subscription_id: String::new(),
            services_pricing,
        }
    }

    /// Parse an `AzureDefenderForCloud` query item
    pub fn from_api_item(item: &Value) -> Self {
        let data = data_of(item);

        let services_pricing = match wrapped(data, "ServicesPricing") {
            Some(Value::Object(plans)) => plans
                .iter()
                .map(|(module, tier)| {
                    let tier = tier.as_str().unwrap_or_default().to_string();
                    (module.clone(), tier)
                })
                .collect(),
            Some(other) => {
                warn!("Unexpected ServicesPricing format: {}", json_type_name(other));
                Vec::new()
            }
            None => Vec::new(),
        };

        let config = Self {
            name: wrapped_str_or(item, "Name", "name"),
            cloud_account_name: cloud_account_name(item),
            subscription_id: wrapped(data, "SecurityCenterSubscription")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            services_pricing,
        };

        debug!(
            "Parsed subscription config: account={} sub={} plans={}",
            config.cloud_account_name,
            config.subscription_id,
            config.services_pricing.len()
        );

        config
    }

    /// Tier configured for a module, if the module is listed
    pub fn tier(&self, module_id: &str) -> Option<&str> {
        self.services_pricing
            .iter()
            .find(|(module, _)| module == module_id)
            .map(|(_, tier)| tier.as_str())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
