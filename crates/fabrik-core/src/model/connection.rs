// ── Connections ──
//
// A virtual connection between two access points (A side and Z side).
// Updates are field-level patches; the resulting change is reported in
// the embedded `change` block.

use serde::{Deserialize, Serialize};

use super::common::{
    Account, ChangeLog, Location, Notification, Operation, Order, Project, Redundancy,
};
use super::state::{ChangeRecord, ResourceState};

/// Reference to another resource by uuid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProtocol {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub protocol_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_tag: Option<i64>,
    #[serde(default, rename = "vlanSTag", skip_serializing_if = "Option::is_none")]
    pub vlan_s_tag: Option<i64>,
    #[serde(default, rename = "vlanCTag", skip_serializing_if = "Option::is_none")]
    pub vlan_c_tag: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPoint {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub access_point_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_protocol: Option<LinkProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peering_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_point: Option<AccessPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<ResourceRef>,
}

/// Free-form key/value pair (e.g. cloud provider secrets).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redundancy: Option<Redundancy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<Notification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_side: Option<ConnectionSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_side: Option<ConnectionSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<Vec<KeyValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<ChangeLog>,
}

impl Connection {
    /// Provider-side status from the operation block.
    pub fn provider_status(&self) -> Option<&str> {
        self.operation
            .as_ref()
            .and_then(|op| op.provider_status.as_deref())
    }
}
