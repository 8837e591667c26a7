//! Property-based tests for defender-savings
//!
//! These tests use proptest to generate random plan sets and inventories
//! and verify that the cost invariants hold across them.

use defender_savings::models::{Asset, AssetKind, Inventory, SubscriptionSecurityConfig};
use defender_savings::output::format_usd;
use defender_savings::{
    build_report, calculate_account_costs, CountKey, PricingTable, ResourceCounter, ResourceCounts,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

const MODULES: &[&str] = &[
    "VirtualMachines",
    "Containers",
    "AppServices",
    "Arm",
    "KeyVaults",
    "CosmosDbs",
    "SqlServers",
    "SqlServerVirtualMachines",
    "OpenSourceRelationalDatabases",
    "StorageAccounts",
    "CloudPosture",
    "Dns",
];

fn tier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Standard".to_string()),
        Just("Free".to_string()),
        Just("standard".to_string()),
        Just(String::new()),
    ]
}

fn plans_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::sample::subsequence(MODULES.to_vec(), 0..=MODULES.len())
        .prop_flat_map(|modules| {
            let n = modules.len();
            (Just(modules), proptest::collection::vec(tier_strategy(), n))
        })
        .prop_map(|(modules, tiers)| {
            modules
                .into_iter()
                .map(str::to_string)
                .zip(tiers)
                .collect()
        })
}

fn counts_strategy() -> impl Strategy<Value = ResourceCounts> {
    (0u64..500, 0u64..500, 0u64..500, 0u64..500, 0u64..2000).prop_map(
        |(vms, apps, storage, vaults, vcores)| {
            ResourceCounts::seeded()
                .with(CountKey::VirtualMachines, vms)
                .with(CountKey::AppServices, apps)
                .with(CountKey::StorageAccounts, storage)
                .with(CountKey::KeyVaults, vaults)
                .with(CountKey::ContainerVcores, vcores)
        },
    )
}

proptest! {
    #[test]
    fn test_totals_are_sum_of_lines(plans in plans_strategy(), counts in counts_strategy()) {
        let pricing = PricingTable::default_table().unwrap();
        let config = SubscriptionSecurityConfig::new("acct", plans);
        let summary = calculate_account_costs(&config, &counts, &pricing);

        let line_total: Decimal = summary.costs.iter().map(|c| c.monthly_cost).sum();
        prop_assert_eq!(summary.total_monthly, line_total);
        prop_assert_eq!(summary.total_annual, summary.total_monthly * Decimal::from(12));
        for cost in &summary.costs {
            prop_assert_eq!(cost.annual_cost, cost.monthly_cost * Decimal::from(12));
            prop_assert_eq!(cost.monthly_cost, cost.unit_price * Decimal::from(cost.count));
        }
    }

    #[test]
    fn test_savings_mirror_costs(plans in plans_strategy(), counts in counts_strategy()) {
        let pricing = PricingTable::default_table().unwrap();
        let config = SubscriptionSecurityConfig::new("acct", plans);
        let summary = calculate_account_costs(&config, &counts, &pricing);

        prop_assert_eq!(summary.costs.len(), summary.savings.len());
        prop_assert_eq!(summary.potential_monthly_saving, summary.total_monthly);
        prop_assert_eq!(summary.potential_annual_saving, summary.total_annual);
        for (cost, saving) in summary.costs.iter().zip(&summary.savings) {
            prop_assert_eq!(&cost.module_id, &saving.module_id);
            prop_assert_eq!(cost.monthly_cost, saving.monthly_saving);
        }
    }

    #[test]
    fn test_lines_sorted_and_billable(plans in plans_strategy(), counts in counts_strategy()) {
        let pricing = PricingTable::default_table().unwrap();
        let config = SubscriptionSecurityConfig::new("acct", plans);
        let summary = calculate_account_costs(&config, &counts, &pricing);

        for pair in summary.costs.windows(2) {
            prop_assert!(pair[0].monthly_cost >= pair[1].monthly_cost);
        }
        for cost in &summary.costs {
            // Only exact "Standard" tiers with a non-zero count are billed
            prop_assert_eq!(cost.tier.as_str(), "Standard");
            prop_assert!(cost.count > 0);
            prop_assert!(pricing.get(&cost.module_id).is_some());
        }
    }

    #[test]
    fn test_container_vcores_sum(vcpus in proptest::collection::vec(1u64..64, 0..20)) {
        let configs = vec![SubscriptionSecurityConfig::new("acct", Vec::new())];
        let mut inventory = Inventory::default();
        for (i, n) in vcpus.iter().enumerate() {
            inventory.push(Asset::container_host("acct", format!("host-{}", i), *n));
        }

        let counts = ResourceCounter::new(&configs).count_resources_per_account(&inventory);
        let expected: u64 = vcpus.iter().sum();
        prop_assert_eq!(counts["acct"].container_vcores, expected);
        prop_assert_eq!(counts["acct"].subscriptions, 1);
    }

    #[test]
    fn test_unknown_accounts_never_counted(
        known in 0usize..5,
        unknown in 0usize..5,
    ) {
        let configs = vec![SubscriptionSecurityConfig::new("known", Vec::new())];
        let mut inventory = Inventory::default();
        for i in 0..known {
            inventory.push(Asset::new(AssetKind::KeyVault, "known", format!("kv-{}", i)));
        }
        for i in 0..unknown {
            inventory.push(Asset::new(AssetKind::KeyVault, "stranger", format!("kv-{}", i)));
        }

        let counts = ResourceCounter::new(&configs).count_resources_per_account(&inventory);
        prop_assert_eq!(counts.len(), 1);
        prop_assert_eq!(counts["known"].key_vaults, known as u64);
    }

    #[test]
    fn test_report_totals_add_up(
        plans_a in plans_strategy(),
        plans_b in plans_strategy(),
        counts_a in counts_strategy(),
        counts_b in counts_strategy(),
    ) {
        let pricing = PricingTable::default_table().unwrap();
        let configs = vec![
            SubscriptionSecurityConfig::new("a", plans_a),
            SubscriptionSecurityConfig::new("b", plans_b),
        ];
        let counts = [("a".to_string(), counts_a), ("b".to_string(), counts_b)]
            .into_iter()
            .collect();

        let report = build_report(&configs, &counts, &pricing);
        let sum: Decimal = report.summaries.iter().map(|s| s.total_monthly).sum();
        prop_assert_eq!(report.total_monthly, sum);
        prop_assert_eq!(report.potential_monthly_saving, report.total_monthly);
        prop_assert_eq!(&report.summaries[0].cloud_account, "a");
        prop_assert_eq!(&report.summaries[1].cloud_account, "b");
    }

    #[test]
    fn test_format_usd_shape(cents in -1_000_000_000i64..1_000_000_000i64) {
        let text = format_usd(Decimal::new(cents, 2));
        let body = text.trim_start_matches('-');

        prop_assert!(body.starts_with('$'));
        prop_assert_eq!(text.starts_with('-'), cents < 0);
        let (_, decimals) = body.split_once('.').unwrap();
        prop_assert_eq!(decimals.len(), 2);
        // Stripping separators recovers the plain value
        let plain: String = text.chars().filter(|c| *c != ',' && *c != '$').collect();
        prop_assert_eq!(plain.parse::<Decimal>().unwrap(), Decimal::new(cents, 2));
    }
}
