// Server inventory models

use serde::{Deserialize, Serialize};

use super::HealthSnapshot;

/// Inventory entry for one managed machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub id: i64,
    #[serde(rename = "serverName")]
    pub name: String,
    pub ip_addresses: Vec<String>,
    pub os_type: String,
}

/// Body of GET /data/{group}: the server list plus the latest health batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupOverview {
    #[serde(rename = "Server", default)]
    pub servers: Vec<ServerRecord>,
    #[serde(rename = "Health", default)]
    pub healths: Vec<HealthSnapshot>,
}
