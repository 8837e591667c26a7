//! Per-account resource counting
//!
//! Groups inventory assets by cloud account name. Only accounts that have a
//! subscription security config are counted; assets belonging to any other
//! account are dropped without error.

use crate::models::{AssetKind, Inventory, SubscriptionSecurityConfig};
use crate::pricing::CountKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Resource counts keyed by cloud account name
pub type AccountCounts = HashMap<String, ResourceCounts>;

/// Billable quantities for one cloud account
///
/// `Default` is the all-zero value used when an account has no counts at
/// all. Accounts produced by [`ResourceCounter`] start from
/// [`ResourceCounts::seeded`] instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounts {
    pub virtual_machines: u64,
    pub app_services: u64,
    pub storage_accounts: u64,
    pub key_vaults: u64,
    pub container_vcores: u64,
    pub subscriptions: u64,
}

impl ResourceCounts {
    /// Zero resources, one subscription
    pub fn seeded() -> Self {
        Self {
            subscriptions: 1,
            ..Self::default()
        }
    }

    /// Quantity for a pricing count key
    ///
    /// `CspmBillable` is derived from VMs plus storage accounts. Keys with no
    /// counter always read as zero.
    pub fn get(&self, key: CountKey) -> u64 {
        match key {
            CountKey::VirtualMachines => self.virtual_machines,
            CountKey::AppServices => self.app_services,
            CountKey::StorageAccounts => self.storage_accounts,
            CountKey::KeyVaults => self.key_vaults,
            CountKey::ContainerVcores => self.container_vcores,
            CountKey::Subscriptions => self.subscriptions,
            CountKey::CspmBillable => self.cspm_billable(),
            CountKey::CosmosDbRuHundreds
            | CountKey::SqlServers
            | CountKey::SqlServerVms
            | CountKey::OssDatabases => 0,
        }
    }

    /// Defender CSPM bills per VM and storage account, not per subscription
    pub fn cspm_billable(&self) -> u64 {
        self.virtual_machines.saturating_add(self.storage_accounts)
    }

    /// Builder-style setter; keys without a stored counter are ignored
    pub fn with(mut self, key: CountKey, value: u64) -> Self {
        match key {
            CountKey::VirtualMachines => self.virtual_machines = value,
            CountKey::AppServices => self.app_services = value,
            CountKey::StorageAccounts => self.storage_accounts = value,
            CountKey::KeyVaults => self.key_vaults = value,
            CountKey::ContainerVcores => self.container_vcores = value,
            CountKey::Subscriptions => self.subscriptions = value,
            _ => debug!("Ignoring count for uncounted key {}", key),
        }
        self
    }

    /// Counters saturate at `u64::MAX`
    fn add(&mut self, kind: AssetKind, amount: u64) {
        let counter = match kind {
            AssetKind::VirtualMachine => &mut self.virtual_machines,
            AssetKind::AppService => &mut self.app_services,
            AssetKind::StorageAccount => &mut self.storage_accounts,
            AssetKind::KeyVault => &mut self.key_vaults,
            AssetKind::ContainerHost => &mut self.container_vcores,
        };
        *counter = counter.saturating_add(amount);
    }
}

/// Maps inventory assets onto the accounts that have a security config
pub struct ResourceCounter<'a> {
    configs: HashMap<&'a str, &'a SubscriptionSecurityConfig>,
}

impl<'a> ResourceCounter<'a> {
    pub fn new(configs: &'a [SubscriptionSecurityConfig]) -> Self {
        let configs = configs
            .iter()
            .map(|cfg| (cfg.cloud_account_name.as_str(), cfg))
            .collect();
        Self { configs }
    }

    /// Security config for an account, if one was fetched
    pub fn config_for(&self, cloud_account_name: &str) -> Option<&'a SubscriptionSecurityConfig> {
        self.configs.get(cloud_account_name).copied()
    }

    pub fn known_accounts(&self) -> usize {
        self.configs.len()
    }

    /// Count resources grouped by cloud account name
    ///
    /// Every known account is present in the result. Container hosts add
    /// their vCPU count to `container_vcores`; every other asset adds one to
    /// the counter for its collection.
    pub fn count_resources_per_account(&self, inventory: &Inventory) -> AccountCounts {
        let mut counts: AccountCounts = self
            .configs
            .keys()
            .map(|name| (name.to_string(), ResourceCounts::seeded()))
            .collect();

        let mut dropped = 0usize;
        for kind in AssetKind::ALL {
            for asset in inventory.collection(kind) {
                let Some(entry) = counts.get_mut(&asset.cloud_account_name) else {
                    dropped += 1;
                    continue;
                };
                let amount = match kind {
                    AssetKind::ContainerHost => asset.vcpus(),
                    _ => 1,
                };
                entry.add(kind, amount);
            }
        }

        if dropped > 0 {
            debug!("Ignored {} resources in accounts without a security config", dropped);
        }
        info!("Mapped resources across {} cloud accounts", self.known_accounts());
        counts
    }
}
