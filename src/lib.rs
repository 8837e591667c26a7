//! defender-savings library
//!
//! Cross-references Defender for Cloud plan tiers of each Azure subscription
//! against inventory resource counts and produces a cost and savings report.
//!
//! Pipeline: [`inventory`] fetches configs and assets, [`counter`] groups
//! assets per account, [`calculator`] prices each subscription, [`report`]
//! collects the summaries and [`output`] renders them.

pub mod calculator;
pub mod config;
pub mod counter;
pub mod error;
pub mod exit_codes;
pub mod inventory;
pub mod models;
pub mod output;
pub mod pricing;
pub mod report;
pub mod retry;

pub use calculator::{calculate_account_costs, AccountSummary, CostLineItem, SavingsLineItem};
pub use counter::{AccountCounts, ResourceCounter, ResourceCounts};
pub use pricing::{CountKey, PricingEntry, PricingTable};
pub use report::{build_report, Report};
