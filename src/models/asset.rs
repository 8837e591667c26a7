use super::{cloud_account_name, data_of, wrapped, wrapped_str_or};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// vCPUs assumed for a container host whose `VCpuCount` is unusable
pub const DEFAULT_VCPUS: u64 = 4;

/// Which inventory collection an asset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    VirtualMachine,
    AppService,
    StorageAccount,
    KeyVault,
    /// A VM running containers; billed per vCore
    ContainerHost,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::VirtualMachine,
        AssetKind::AppService,
        AssetKind::StorageAccount,
        AssetKind::KeyVault,
        AssetKind::ContainerHost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::VirtualMachine => "VMs",
            AssetKind::AppService => "App Services",
            AssetKind::StorageAccount => "Storage Accounts",
            AssetKind::KeyVault => "Key Vaults",
            AssetKind::ContainerHost => "Container Hosts",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An Azure asset reported by the inventory API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub kind: AssetKind,
    pub name: String,
    pub cloud_account_name: String,
    pub asset_unique_id: String,
    /// Only set for container hosts
    pub vcpu_count: Option<u64>,
}

impl Asset {
    pub fn new(kind: AssetKind, cloud_account_name: impl Into<String>, name: impl Into<String>) -> Self {
        let cloud_account_name = cloud_account_name.into();
        let name = name.into();
        Self {
            kind,
            asset_unique_id: format!("{}/{}", cloud_account_name, name),
            name,
            cloud_account_name,
            vcpu_count: (kind == AssetKind::ContainerHost).then_some(DEFAULT_VCPUS),
        }
    }

    pub fn container_host(
        cloud_account_name: impl Into<String>,
        name: impl Into<String>,
        vcpu_count: u64,
    ) -> Self {
        Self {
            vcpu_count: Some(vcpu_count),
            ..Self::new(AssetKind::ContainerHost, cloud_account_name, name)
        }
    }

    /// Parse a query item into an asset of the given kind
    pub fn from_api_item(kind: AssetKind, item: &Value) -> Self {
        let vcpu_count = match kind {
            AssetKind::ContainerHost => Some(parse_vcpus(wrapped(data_of(item), "VCpuCount"))),
            _ => None,
        };

        Self {
            kind,
            name: wrapped_str_or(item, "Name", "name"),
            cloud_account_name: cloud_account_name(item),
            asset_unique_id: wrapped_str_or(item, "AssetUniqueId", "id"),
            vcpu_count,
        }
    }

    /// vCores this asset contributes to container billing
    pub fn vcpus(&self) -> u64 {
        self.vcpu_count.unwrap_or(DEFAULT_VCPUS)
    }
}

/// The five asset collections one report run works from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub virtual_machines: Vec<Asset>,
    pub app_services: Vec<Asset>,
    pub storage_accounts: Vec<Asset>,
    pub key_vaults: Vec<Asset>,
    pub container_hosts: Vec<Asset>,
}

impl Inventory {
    pub fn collection(&self, kind: AssetKind) -> &[Asset] {
        match kind {
            AssetKind::VirtualMachine => &self.virtual_machines,
            AssetKind::AppService => &self.app_services,
            AssetKind::StorageAccount => &self.storage_accounts,
            AssetKind::KeyVault => &self.key_vaults,
            AssetKind::ContainerHost => &self.container_hosts,
        }
    }

    pub fn collection_mut(&mut self, kind: AssetKind) -> &mut Vec<Asset> {
        match kind {
            AssetKind::VirtualMachine => &mut self.virtual_machines,
            AssetKind::AppService => &mut self.app_services,
            AssetKind::StorageAccount => &mut self.storage_accounts,
            AssetKind::KeyVault => &mut self.key_vaults,
            AssetKind::ContainerHost => &mut self.container_hosts,
        }
    }

    /// Append an asset to the collection matching its kind
    pub fn push(&mut self, asset: Asset) {
        self.collection_mut(asset.kind).push(asset);
    }

    pub fn len(&self) -> usize {
        AssetKind::ALL.iter().map(|&k| self.collection(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positive integers are taken as-is; anything else falls back to the default
fn parse_vcpus(value: Option<&Value>) -> u64 {
    value
        .and_then(Value::as_u64)
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_VCPUS)
}
