//! Typed fetchers over [`InventoryQuery`]

use super::{InventoryQuery, QueryRequest};
use crate::error::Result;
use crate::models::{Asset, AssetKind, Inventory, SubscriptionSecurityConfig};
use serde_json::{json, Value};
use tracing::info;

const DEFENDER_MODEL: &str = "AzureDefenderForCloud";

const DEFENDER_SELECT: &[&str] = &[
    "Name",
    "CloudAccount.Name",
    "CloudAccount.CloudProvider",
    "BusinessUnits.Name",
    "AutoProvisioning",
    "PolicyAssignments",
    "SecurityCenterSubscription",
    "SecurityContacts",
    "ServicesPricing",
    "Settings",
];

const ASSET_SELECT: &[&str] = &[
    "Name",
    "CloudAccount.Name",
    "CloudAccount.CloudProvider",
    "BusinessUnits.Name",
    "OrcaScore",
    "RiskLevel",
    "group_unique_id",
    "UiUniqueField",
    "IsInternetFacing",
    "Tags",
    "NewSubCategory",
    "AssetUniqueId",
    "ConsoleUrlLink",
];

const CONTAINER_HOST_SELECT: &[&str] = &[
    "Name",
    "CloudAccount.Name",
    "CloudAccount.CloudProvider",
    "BusinessUnits.Name",
    "OrcaScore",
    "RiskLevel",
    "State",
    "StopDate",
    "group_unique_id",
    "UiUniqueField",
    "IsInternetFacing",
    "VCpuCount",
    "CpuCount",
    "Containers.Name",
    "Tags",
    "NewSubCategory",
    "AssetUniqueId",
    "ConsoleUrlLink",
    "DistributionName",
    "IngressPorts",
    "PrivateIps",
    "PublicIps",
];

/// VMs that run containers and report a vCPU count
fn container_host_filter() -> Value {
    json!({
        "operator": "and",
        "type": "operation",
        "values": [
            {
                "keys": ["Containers"],
                "models": ["Container"],
                "type": "object_set",
                "operator": "has",
            },
            {
                "key": "VCpuCount",
                "values": [],
                "type": "int",
                "operator": "exists",
            },
        ],
    })
}

/// Query used to fetch one asset collection
pub fn asset_query(kind: AssetKind) -> QueryRequest {
    match kind {
        AssetKind::VirtualMachine => QueryRequest::new("AzureComputeVm", ASSET_SELECT),
        AssetKind::AppService => QueryRequest::new("AzureWebAppService", ASSET_SELECT),
        AssetKind::StorageAccount => QueryRequest::new("AzureStorageAccount", ASSET_SELECT),
        AssetKind::KeyVault => QueryRequest::new("AzureKeyVault", ASSET_SELECT),
        AssetKind::ContainerHost => QueryRequest::new("AzureComputeVm", CONTAINER_HOST_SELECT)
            .with_filter(container_host_filter()),
    }
}

/// Fetch every Defender for Cloud subscription config
pub async fn list_subscription_configs<Q>(client: &Q) -> Result<Vec<SubscriptionSecurityConfig>>
where
    Q: InventoryQuery + ?Sized,
{
    info!("Fetching Defender for Cloud configurations");
    let request = QueryRequest::new(DEFENDER_MODEL, DEFENDER_SELECT);
    let configs: Vec<_> = client
        .query(&request)
        .await?
        .iter()
        .map(SubscriptionSecurityConfig::from_api_item)
        .collect();

    info!("Found {} Defender configurations", configs.len());
    Ok(configs)
}

/// Fetch one asset collection
pub async fn list_assets<Q>(client: &Q, kind: AssetKind) -> Result<Vec<Asset>>
where
    Q: InventoryQuery + ?Sized,
{
    info!("Fetching Azure {}", kind);
    let items = client.query(&asset_query(kind)).await?;
    Ok(items
        .iter()
        .map(|item| Asset::from_api_item(kind, item))
        .collect())
}

/// Fetch all five asset collections
pub async fn fetch_inventory<Q>(client: &Q) -> Result<Inventory>
where
    Q: InventoryQuery + ?Sized,
{
    let mut inventory = Inventory::default();
    for kind in AssetKind::ALL {
        *inventory.collection_mut(kind) = list_assets(client, kind).await?;
    }

    info!(
        "Total resources: {} VMs, {} App Services, {} Storage Accounts, {} Key Vaults, {} Container Hosts",
        inventory.virtual_machines.len(),
        inventory.app_services.len(),
        inventory.storage_accounts.len(),
        inventory.key_vaults.len(),
        inventory.container_hosts.len(),
    );
    Ok(inventory)
}
