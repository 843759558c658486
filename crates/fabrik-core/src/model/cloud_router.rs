use serde::{Deserialize, Serialize};

use super::common::{Account, ChangeLog, Location, Notification, Order, Package, Project};
use super::state::ResourceState;

/// A Fabric Cloud Router (`/fabric/v4/routers`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudRouter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub router_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equinix_asn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<Notification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<ChangeLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections_count: Option<i64>,
    #[serde(default, rename = "bgpIpv4RoutesCount", skip_serializing_if = "Option::is_none")]
    pub bgp_ipv4_routes_count: Option<i64>,
    #[serde(default, rename = "bgpIpv6RoutesCount", skip_serializing_if = "Option::is_none")]
    pub bgp_ipv6_routes_count: Option<i64>,
}

impl CloudRouter {
    /// Package code, if one is set.
    pub fn package_code(&self) -> Option<&str> {
        self.package.as_ref().and_then(|p| p.code.as_deref())
    }
}
