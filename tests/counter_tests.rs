//! Tests for per-account resource counting and report composition

use defender_savings::models::{Asset, AssetKind, Inventory, SubscriptionSecurityConfig};
use defender_savings::{build_report, PricingTable, ResourceCounter, ResourceCounts};
use rust_decimal::Decimal;

fn configs(accounts: &[&str]) -> Vec<SubscriptionSecurityConfig> {
    accounts
        .iter()
        .map(|a| SubscriptionSecurityConfig::new(*a, Vec::new()))
        .collect()
}

fn asset(kind: AssetKind, account: &str) -> Asset {
    Asset::new(kind, account, format!("{:?}", kind))
}

#[test]
fn test_unknown_account_resources_ignored() {
    let configs = configs(&["acct-1"]);
    let mut inventory = Inventory::default();
    inventory.push(asset(AssetKind::VirtualMachine, "unknown-acct"));
    inventory.push(Asset::container_host("unknown-acct", "host", 8));

    let counts = ResourceCounter::new(&configs).count_resources_per_account(&inventory);

    assert_eq!(counts.len(), 1);
    assert!(!counts.contains_key("unknown-acct"));
    assert_eq!(counts["acct-1"], ResourceCounts::seeded());
}

#[test]
fn test_multi_account_multi_resource() {
    let configs = configs(&["a", "b"]);
    let mut inventory = Inventory::default();
    inventory.push(asset(AssetKind::VirtualMachine, "a"));
    inventory.push(asset(AssetKind::VirtualMachine, "b"));
    inventory.push(asset(AssetKind::VirtualMachine, "b"));
    inventory.push(asset(AssetKind::AppService, "a"));
    inventory.push(asset(AssetKind::StorageAccount, "b"));
    inventory.push(asset(AssetKind::KeyVault, "a"));
    inventory.push(asset(AssetKind::KeyVault, "a"));

    let counts = ResourceCounter::new(&configs).count_resources_per_account(&inventory);

    assert_eq!(counts["a"].virtual_machines, 1);
    assert_eq!(counts["a"].app_services, 1);
    assert_eq!(counts["a"].key_vaults, 2);
    assert_eq!(counts["a"].storage_accounts, 0);
    assert_eq!(counts["b"].virtual_machines, 2);
    assert_eq!(counts["b"].storage_accounts, 1);
    assert_eq!(counts["b"].key_vaults, 0);
}

#[test]
fn test_container_hosts_contribute_vcpu_count() {
    let configs = configs(&["acct-1"]);
    let mut inventory = Inventory::default();
    inventory.push(Asset::container_host("acct-1", "host-1", 8));
    inventory.push(Asset::container_host("acct-1", "host-2", 16));

    let counts = ResourceCounter::new(&configs).count_resources_per_account(&inventory);

    // 8 + 16, not one per host
    assert_eq!(counts["acct-1"].container_vcores, 24);
    assert_eq!(counts["acct-1"].virtual_machines, 0);
}

#[test]
fn test_subscriptions_always_one_and_empty_gives_zeroes() {
    let configs = configs(&["acct-1", "acct-2"]);
    let counts = ResourceCounter::new(&configs).count_resources_per_account(&Inventory::default());

    for account in ["acct-1", "acct-2"] {
        let c = counts[account];
        assert_eq!(c.subscriptions, 1);
        assert_eq!(c.virtual_machines, 0);
        assert_eq!(c.app_services, 0);
        assert_eq!(c.storage_accounts, 0);
        assert_eq!(c.key_vaults, 0);
        assert_eq!(c.container_vcores, 0);
    }
}

#[test]
fn test_counter_does_not_mutate_inventory() {
    let configs = configs(&["acct-1"]);
    let mut inventory = Inventory::default();
    inventory.push(asset(AssetKind::KeyVault, "acct-1"));
    let before = inventory.clone();

    ResourceCounter::new(&configs).count_resources_per_account(&inventory);

    assert_eq!(inventory.key_vaults, before.key_vaults);
    assert_eq!(inventory.len(), 1);
}

#[test]
fn test_report_follows_fetch_order_and_totals() {
    let pricing = PricingTable::default_table().unwrap();
    let arm = vec![("Arm".to_string(), "Standard".to_string())];
    let configs = vec![
        SubscriptionSecurityConfig::new("zeta", arm.clone()),
        SubscriptionSecurityConfig::new("alpha", arm.clone()),
        SubscriptionSecurityConfig::new("no-counts", arm),
    ];

    let mut inventory = Inventory::default();
    inventory.push(asset(AssetKind::VirtualMachine, "alpha"));
    // counts only for zeta and alpha; no-counts is priced against zero counts
    let counts = ResourceCounter::new(&configs[..2]).count_resources_per_account(&inventory);

    let report = build_report(&configs, &counts, &pricing);

    let accounts: Vec<&str> = report.summaries.iter().map(|s| s.cloud_account.as_str()).collect();
    assert_eq!(accounts, vec!["zeta", "alpha", "no-counts"]);

    // Arm bills one subscription for each counted account only
    assert_eq!(report.summaries[2].costs.len(), 0);
    assert_eq!(report.total_monthly, Decimal::new(1008, 2));
    assert_eq!(report.total_annual, Decimal::new(12096, 2));
    assert_eq!(report.potential_monthly_saving, report.total_monthly);
    assert_eq!(report.cost_items().count(), 2);
    assert!(report.has_savings());
}
