//! Defender for Cloud pricing table
//!
//! Prices are USD pay-as-you-go list prices from
//! <https://azure.microsoft.com/en-us/pricing/details/defender-for-cloud/>.
//! Module identifiers match the `ServicesPricing` plan names returned by the
//! inventory API. Each entry draws its billable quantity from one
//! [`CountKey`].

use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Resource-count field a pricing entry bills against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountKey {
    #[serde(rename = "virtual_machines")]
    VirtualMachines,
    #[serde(rename = "app_services")]
    AppServices,
    #[serde(rename = "storage_accounts")]
    StorageAccounts,
    #[serde(rename = "key_vaults")]
    KeyVaults,
    #[serde(rename = "container_vcores")]
    ContainerVcores,
    #[serde(rename = "subscriptions")]
    Subscriptions,
    /// Derived: virtual machines + storage accounts
    #[serde(rename = "_cspm_billable")]
    CspmBillable,
    #[serde(rename = "cosmos_db_ru_hundreds")]
    CosmosDbRuHundreds,
    #[serde(rename = "sql_servers")]
    SqlServers,
    #[serde(rename = "sql_server_vms")]
    SqlServerVms,
    #[serde(rename = "oss_databases")]
    OssDatabases,
}

impl CountKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountKey::VirtualMachines => "virtual_machines",
            CountKey::AppServices => "app_services",
            CountKey::StorageAccounts => "storage_accounts",
            CountKey::KeyVaults => "key_vaults",
            CountKey::ContainerVcores => "container_vcores",
            CountKey::Subscriptions => "subscriptions",
            CountKey::CspmBillable => "_cspm_billable",
            CountKey::CosmosDbRuHundreds => "cosmos_db_ru_hundreds",
            CountKey::SqlServers => "sql_servers",
            CountKey::SqlServerVms => "sql_server_vms",
            CountKey::OssDatabases => "oss_databases",
        }
    }

    /// Whether the resource counter produces a value for this key
    ///
    /// Cosmos DB, SQL and OSS database keys have no counter yet, so modules
    /// priced against them never bill.
    pub fn is_counted(&self) -> bool {
        !matches!(
            self,
            CountKey::CosmosDbRuHundreds
                | CountKey::SqlServers
                | CountKey::SqlServerVms
                | CountKey::OssDatabases
        )
    }
}

impl fmt::Display for CountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One billable module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub module_id: String,
    pub description: String,
    pub unit_price: Decimal,
    pub unit_label: String,
    pub count_key: CountKey,
}

impl PricingEntry {
    pub fn new(
        module_id: &str,
        description: &str,
        unit_price: Decimal,
        unit_label: &str,
        count_key: CountKey,
    ) -> Self {
        Self {
            module_id: module_id.to_string(),
            description: description.to_string(),
            unit_price,
            unit_label: unit_label.to_string(),
            count_key,
        }
    }
}

/// Immutable, validated lookup from module identifier to pricing
#[derive(Debug, Clone)]
pub struct PricingTable {
    entries: Vec<PricingEntry>,
    index: HashMap<String, usize>,
}

impl PricingTable {
    /// Build a table, rejecting malformed entries
    pub fn new(entries: Vec<PricingEntry>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (pos, entry) in entries.iter().enumerate() {
            if entry.module_id.trim().is_empty() {
                return Err(ConfigError::InvalidPricing {
                    module: format!("#{}", pos),
                    reason: "module id is empty".to_string(),
                });
            }
            if entry.unit_price < Decimal::ZERO {
                return Err(ConfigError::InvalidPricing {
                    module: entry.module_id.clone(),
                    reason: format!("unit price {} is negative", entry.unit_price),
                });
            }
            if entry.description.trim().is_empty() {
                return Err(ConfigError::InvalidPricing {
                    module: entry.module_id.clone(),
                    reason: "description is empty".to_string(),
                });
            }
            if entry.unit_label.trim().is_empty() {
                return Err(ConfigError::InvalidPricing {
                    module: entry.module_id.clone(),
                    reason: "unit label is empty".to_string(),
                });
            }
            if index.insert(entry.module_id.clone(), pos).is_some() {
                return Err(ConfigError::InvalidPricing {
                    module: entry.module_id.clone(),
                    reason: "duplicate module id".to_string(),
                });
            }
        }

        Ok(Self { entries, index })
    }

    /// The built-in Defender for Cloud price list (last checked 2026-02-14)
    pub fn default_table() -> Result<Self, ConfigError> {
        let entries = vec![
            PricingEntry::new(
                "VirtualMachines",
                "Defender for Servers Plan 2",
                Decimal::new(1460, 2),
                "server/mo",
                CountKey::VirtualMachines,
            ),
            PricingEntry::new(
                "Containers",
                "Defender for Containers",
                Decimal::new(68693, 4),
                "vCore/mo",
                CountKey::ContainerVcores,
            ),
            PricingEntry::new(
                "AppServices",
                "Defender for App Service",
                Decimal::new(1460, 2),
                "instance/mo",
                CountKey::AppServices,
            ),
            PricingEntry::new(
                "Arm",
                "Defender for Resource Manager",
                Decimal::new(504, 2),
                "subscription/mo",
                CountKey::Subscriptions,
            ),
            PricingEntry::new(
                "KeyVaults",
                "Defender for Key Vault",
                Decimal::new(25, 2),
                "vault/mo",
                CountKey::KeyVaults,
            ),
            PricingEntry::new(
                "CosmosDbs",
                "Defender for Azure Cosmos DB",
                Decimal::new(876, 3),
                "100 RUs/mo",
                CountKey::CosmosDbRuHundreds,
            ),
            PricingEntry::new(
                "SqlServers",
                "Defender for SQL (Azure-connected)",
                Decimal::new(1500, 2),
                "instance/mo",
                CountKey::SqlServers,
            ),
            PricingEntry::new(
                "SqlServerVirtualMachines",
                "Defender for SQL on machines",
                Decimal::new(1500, 2),
                "instance/mo",
                CountKey::SqlServerVms,
            ),
            PricingEntry::new(
                "OpenSourceRelationalDatabases",
                "Defender for OSS Databases",
                Decimal::new(1500, 2),
                "instance/mo",
                CountKey::OssDatabases,
            ),
            PricingEntry::new(
                "StorageAccounts",
                "Defender for Storage",
                Decimal::new(1000, 2),
                "storage account/mo",
                CountKey::StorageAccounts,
            ),
            PricingEntry::new(
                "CloudPosture",
                "Defender CSPM",
                Decimal::new(500, 2),
                "billable resource/mo",
                CountKey::CspmBillable,
            ),
        ];

        Self::new(entries)
    }

    pub fn get(&self, module_id: &str) -> Option<&PricingEntry> {
        self.index.get(module_id).map(|&pos| &self.entries[pos])
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[PricingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Modules that can never bill because nothing counts their resources
    pub fn uncounted_modules(&self) -> Vec<&PricingEntry> {
        self.entries
            .iter()
            .filter(|e| !e.count_key.is_counted())
            .collect()
    }
}
