//! Report composition across subscriptions

use crate::calculator::{calculate_account_costs, AccountSummary, CostLineItem, SavingsLineItem};
use crate::counter::AccountCounts;
use crate::models::SubscriptionSecurityConfig;
use crate::pricing::PricingTable;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All account summaries of one run plus grand totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// One summary per subscription config, in fetch order
    pub summaries: Vec<AccountSummary>,
    pub total_monthly: Decimal,
    pub total_annual: Decimal,
    pub potential_monthly_saving: Decimal,
    pub potential_annual_saving: Decimal,
}

impl Report {
    pub fn from_summaries(summaries: Vec<AccountSummary>) -> Self {
        let mut report = Self {
            generated_at: Utc::now(),
            summaries: Vec::with_capacity(summaries.len()),
            total_monthly: Decimal::ZERO,
            total_annual: Decimal::ZERO,
            potential_monthly_saving: Decimal::ZERO,
            potential_annual_saving: Decimal::ZERO,
        };
        for summary in summaries {
            report.total_monthly += summary.total_monthly;
            report.total_annual += summary.total_annual;
            report.potential_monthly_saving += summary.potential_monthly_saving;
            report.potential_annual_saving += summary.potential_annual_saving;
            report.summaries.push(summary);
        }
        report
    }

    /// Every cost line, grouped by account in report order
    pub fn cost_items(&self) -> impl Iterator<Item = &CostLineItem> {
        self.summaries.iter().flat_map(|s| s.costs.iter())
    }

    /// Every savings line, grouped by account in report order
    pub fn savings_items(&self) -> impl Iterator<Item = &SavingsLineItem> {
        self.summaries.iter().flat_map(|s| s.savings.iter())
    }

    pub fn has_savings(&self) -> bool {
        self.savings_items().next().is_some()
    }
}

/// Run the calculator for every subscription, in the order given
///
/// Accounts with no entry in `counts` are priced against all-zero counts.
pub fn build_report(
    configs: &[SubscriptionSecurityConfig],
    counts: &AccountCounts,
    pricing: &PricingTable,
) -> Report {
    let summaries = configs
        .iter()
        .map(|config| {
            let account_counts = counts
                .get(&config.cloud_account_name)
                .copied()
                .unwrap_or_default();
            calculate_account_costs(config, &account_counts, pricing)
        })
        .collect();

    Report::from_summaries(summaries)
}

