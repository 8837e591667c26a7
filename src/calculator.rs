//! Cost and savings calculation for one subscription
//!
//! A module is billed when its tier is exactly `"Standard"`, it has a
//! pricing entry, and the account has a non-zero count for the entry's
//! count key. Savings model disabling each billed module outright, so every
//! savings line equals its cost line.

use crate::counter::ResourceCounts;
use crate::models::{SubscriptionSecurityConfig, STANDARD_TIER};
use crate::pricing::PricingTable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Convert a monthly amount to an annual one
pub fn annualize(monthly: Decimal) -> Decimal {
    monthly * Decimal::from(12u32)
}

/// A billed module for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub cloud_account: String,
    pub module_id: String,
    pub description: String,
    pub tier: String,
    pub count: u64,
    pub unit_price: Decimal,
    pub unit_label: String,
    pub monthly_cost: Decimal,
    pub annual_cost: Decimal,
}

/// Saving from disabling a billed module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsLineItem {
    pub cloud_account: String,
    pub module_id: String,
    pub description: String,
    pub monthly_saving: Decimal,
    pub annual_saving: Decimal,
}

/// Costs and savings of one cloud account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub cloud_account: String,
    /// Sorted by `monthly_cost`, highest first
    pub costs: Vec<CostLineItem>,
    /// Sorted by `monthly_saving`, highest first
    pub savings: Vec<SavingsLineItem>,
    pub total_monthly: Decimal,
    pub total_annual: Decimal,
    pub potential_monthly_saving: Decimal,
    pub potential_annual_saving: Decimal,
}

/// Price the enabled plans of one subscription against its resource counts
pub fn calculate_account_costs(
    config: &SubscriptionSecurityConfig,
    counts: &ResourceCounts,
    pricing: &PricingTable,
) -> AccountSummary {
    let mut costs = Vec::new();
    let mut savings = Vec::new();
    let mut total_monthly = Decimal::ZERO;

    for (module, tier) in &config.services_pricing {
        if tier != STANDARD_TIER {
            continue;
        }

        let Some(entry) = pricing.get(module) else {
            debug!("Skipping module {} (no pricing info)", module);
            continue;
        };

        let count = counts.get(entry.count_key);
        if count == 0 {
            debug!("Skipping module {} (0 resources)", module);
            continue;
        }

        let monthly = entry.unit_price * Decimal::from(count);
        let annual = annualize(monthly);

        costs.push(CostLineItem {
            cloud_account: config.cloud_account_name.clone(),
            module_id: module.clone(),
            description: entry.description.clone(),
            tier: tier.clone(),
            count,
            unit_price: entry.unit_price,
            unit_label: entry.unit_label.clone(),
            monthly_cost: monthly,
            annual_cost: annual,
        });
        savings.push(SavingsLineItem {
            cloud_account: config.cloud_account_name.clone(),
            module_id: module.clone(),
            description: entry.description.clone(),
            monthly_saving: monthly,
            annual_saving: annual,
        });
        total_monthly += monthly;
    }

    // sort_by is stable: equal amounts keep services_pricing order
    costs.sort_by(|a, b| b.monthly_cost.cmp(&a.monthly_cost));
    savings.sort_by(|a, b| b.monthly_saving.cmp(&a.monthly_saving));
    let potential_monthly_saving: Decimal = savings.iter().map(|s| s.monthly_saving).sum();

    info!(
        "Account {}: ${:.2}/mo, potential savings ${:.2}/mo",
        config.cloud_account_name, total_monthly, potential_monthly_saving
    );

    AccountSummary {
        cloud_account: config.cloud_account_name.clone(),
        costs,
        savings,
        total_monthly,
        total_annual: annualize(total_monthly),
        potential_monthly_saving,
        potential_annual_saving: annualize(potential_monthly_saving),
    }
}
