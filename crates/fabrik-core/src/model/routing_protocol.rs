// ── Routing protocols ──
//
// Attached to a connection. Two shapes share one endpoint, told apart by
// the `type` discriminator: BGP sessions and direct (static) addressing.

use serde::{Deserialize, Serialize};

use super::common::{ChangeLog, Operation};
use super::state::{ChangeRecord, ResourceState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgpAddressFamily {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_peer_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equinix_peer_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equinix_iface_ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bfd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgpRoutingProtocol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_asn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equinix_asn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_auth_key: Option<String>,
    #[serde(default, rename = "bgpIpv4", skip_serializing_if = "Option::is_none")]
    pub bgp_ipv4: Option<BgpAddressFamily>,
    #[serde(default, rename = "bgpIpv6", skip_serializing_if = "Option::is_none")]
    pub bgp_ipv6: Option<BgpAddressFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bfd: Option<Bfd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<ChangeLog>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRoutingProtocol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceState>,
    #[serde(default, rename = "directIpv4", skip_serializing_if = "Option::is_none")]
    pub direct_ipv4: Option<DirectAddress>,
    #[serde(default, rename = "directIpv6", skip_serializing_if = "Option::is_none")]
    pub direct_ipv6: Option<DirectAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<ChangeLog>,
}

/// A routing protocol, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoutingProtocol {
    #[serde(rename = "BGP")]
    Bgp(BgpRoutingProtocol),
    #[serde(rename = "DIRECT")]
    Direct(DirectRoutingProtocol),
}

impl Default for RoutingProtocol {
    fn default() -> Self {
        Self::Direct(DirectRoutingProtocol::default())
    }
}

impl RoutingProtocol {
    pub const BGP: &'static str = "BGP";
    pub const DIRECT: &'static str = "DIRECT";

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bgp(_) => Self::BGP,
            Self::Direct(_) => Self::DIRECT,
        }
    }

    pub fn uuid(&self) -> Option<&str> {
        match self {
            Self::Bgp(p) => p.uuid.as_deref(),
            Self::Direct(p) => p.uuid.as_deref(),
        }
    }

    pub fn state(&self) -> Option<ResourceState> {
        match self {
            Self::Bgp(p) => p.state,
            Self::Direct(p) => p.state,
        }
    }

    pub fn change(&self) -> Option<&ChangeRecord> {
        match self {
            Self::Bgp(p) => p.change.as_ref(),
            Self::Direct(p) => p.change.as_ref(),
        }
    }
}
