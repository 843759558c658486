// Fabric v4 resource kinds.

use super::AttributeMapping;
use crate::attrs::AttributeBag;
use crate::error::{CoreError, ValidationError};
use crate::model::{
    AccessPoint, Bfd, BgpAddressFamily, BgpRoutingProtocol, CloudRouter, Connection,
    ConnectionSide, DirectAddress, DirectRoutingProtocol, Encapsulation, Gateway, KeyValue,
    LinkProtocol, Network, Port, ResourceRef, RoutingProtocol, ServiceProfile,
};

// ── Cloud router ────────────────────────────────────────────────────

impl AttributeMapping for CloudRouter {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            href: bag.string("href")?,
            name: bag.string("name")?,
            router_type: bag.string("type")?,
            state: bag.parsed("state")?,
            equinix_asn: bag.int("equinix_asn")?,
            package: bag.mapped("package")?,
            location: bag.mapped("location")?,
            project: bag.mapped("project")?,
            account: bag.mapped("account")?,
            order: bag.mapped("order")?,
            notifications: bag.mapped_list("notifications")?,
            change_log: bag.mapped("change_log")?,
            connections_count: bag.int("connections_count")?,
            bgp_ipv4_routes_count: bag.int("bgp_ipv4_routes_count")?,
            bgp_ipv6_routes_count: bag.int("bgp_ipv6_routes_count")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("href", self.href.as_ref())
            .put("name", self.name.as_ref())
            .put("type", self.router_type.as_ref())
            .put_display("state", self.state)
            .put("equinix_asn", self.equinix_asn)
            .put_block("package", self.package.as_ref())
            .put_block("location", self.location.as_ref())
            .put_block("project", self.project.as_ref())
            .put_block("account", self.account.as_ref())
            .put_block("order", self.order.as_ref())
            .put_blocks("notifications", self.notifications.as_deref())
            .put_block("change_log", self.change_log.as_ref())
            .put("connections_count", self.connections_count)
            .put("bgp_ipv4_routes_count", self.bgp_ipv4_routes_count)
            .put("bgp_ipv6_routes_count", self.bgp_ipv6_routes_count);
        bag
    }
}

// ── Gateway ─────────────────────────────────────────────────────────

impl AttributeMapping for Gateway {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            href: bag.string("href")?,
            name: bag.string("name")?,
            gateway_type: bag.string("type")?,
            state: bag.parsed("state")?,
            package: bag.mapped("package")?,
            location: bag.mapped("location")?,
            project: bag.mapped("project")?,
            account: bag.mapped("account")?,
            order: bag.mapped("order")?,
            notifications: bag.mapped_list("notifications")?,
            change_log: bag.mapped("change_log")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("href", self.href.as_ref())
            .put("name", self.name.as_ref())
            .put("type", self.gateway_type.as_ref())
            .put_display("state", self.state)
            .put_block("package", self.package.as_ref())
            .put_block("location", self.location.as_ref())
            .put_block("project", self.project.as_ref())
            .put_block("account", self.account.as_ref())
            .put_block("order", self.order.as_ref())
            .put_blocks("notifications", self.notifications.as_deref())
            .put_block("change_log", self.change_log.as_ref());
        bag
    }
}

// ── Connection ──────────────────────────────────────────────────────

impl AttributeMapping for ResourceRef {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            name: bag.string("name")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("name", self.name.as_ref());
        bag
    }
}

impl AttributeMapping for LinkProtocol {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            protocol_type: bag.string("type")?,
            vlan_tag: bag.int("vlan_tag")?,
            vlan_s_tag: bag.int("vlan_s_tag")?,
            vlan_c_tag: bag.int("vlan_c_tag")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("type", self.protocol_type.as_ref())
            .put("vlan_tag", self.vlan_tag)
            .put("vlan_s_tag", self.vlan_s_tag)
            .put("vlan_c_tag", self.vlan_c_tag);
        bag
    }
}

impl AttributeMapping for AccessPoint {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            access_point_type: bag.string("type")?,
            port: bag.mapped("port")?,
            router: bag.mapped("router")?,
            network: bag.mapped("network")?,
            profile: bag.mapped("profile")?,
            location: bag.mapped("location")?,
            link_protocol: bag.mapped("link_protocol")?,
            seller_region: bag.string("seller_region")?,
            authentication_key: bag.string("authentication_key")?,
            peering_type: bag.string("peering_type")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("type", self.access_point_type.as_ref())
            .put_block("port", self.port.as_ref())
            .put_block("router", self.router.as_ref())
            .put_block("network", self.network.as_ref())
            .put_block("profile", self.profile.as_ref())
            .put_block("location", self.location.as_ref())
            .put_block("link_protocol", self.link_protocol.as_ref())
            .put("seller_region", self.seller_region.as_ref())
            .put("authentication_key", self.authentication_key.as_ref())
            .put("peering_type", self.peering_type.as_ref());
        bag
    }
}

impl AttributeMapping for ConnectionSide {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            access_point: bag.mapped("access_point")?,
            service_token: bag.mapped("service_token")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put_block("access_point", self.access_point.as_ref())
            .put_block("service_token", self.service_token.as_ref());
        bag
    }
}

impl AttributeMapping for KeyValue {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            key: bag.string("key")?,
            value: bag.string("value")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("key", self.key.as_ref())
            .put("value", self.value.as_ref());
        bag
    }
}

impl AttributeMapping for Connection {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            href: bag.string("href")?,
            name: bag.string("name")?,
            connection_type: bag.string("type")?,
            state: bag.parsed("state")?,
            bandwidth: bag.int("bandwidth")?,
            redundancy: bag.mapped("redundancy")?,
            order: bag.mapped("order")?,
            notifications: bag.mapped_list("notifications")?,
            project: bag.mapped("project")?,
            account: bag.mapped("account")?,
            a_side: bag.mapped("a_side")?,
            z_side: bag.mapped("z_side")?,
            additional_info: bag.mapped_list("additional_info")?,
            operation: bag.mapped("operation")?,
            change: bag.mapped("change")?,
            change_log: bag.mapped("change_log")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("href", self.href.as_ref())
            .put("name", self.name.as_ref())
            .put("type", self.connection_type.as_ref())
            .put_display("state", self.state)
            .put("bandwidth", self.bandwidth)
            .put_block("redundancy", self.redundancy.as_ref())
            .put_block("order", self.order.as_ref())
            .put_blocks("notifications", self.notifications.as_deref())
            .put_block("project", self.project.as_ref())
            .put_block("account", self.account.as_ref())
            .put_block("a_side", self.a_side.as_ref())
            .put_block("z_side", self.z_side.as_ref())
            .put_blocks("additional_info", self.additional_info.as_deref())
            .put_block("operation", self.operation.as_ref())
            .put_block("change", self.change.as_ref())
            .put_block("change_log", self.change_log.as_ref());
        bag
    }
}

// ── Routing protocol ────────────────────────────────────────────────

impl AttributeMapping for BgpAddressFamily {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            customer_peer_ip: bag.string("customer_peer_ip")?,
            equinix_peer_ip: bag.string("equinix_peer_ip")?,
            enabled: bag.boolean("enabled")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("customer_peer_ip", self.customer_peer_ip.as_ref())
            .put("equinix_peer_ip", self.equinix_peer_ip.as_ref())
            .put("enabled", self.enabled);
        bag
    }
}

impl AttributeMapping for DirectAddress {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            equinix_iface_ip: bag.string("equinix_iface_ip")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("equinix_iface_ip", self.equinix_iface_ip.as_ref());
        bag
    }
}

impl AttributeMapping for Bfd {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            enabled: bag.boolean("enabled")?,
            interval: bag.string("interval")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("enabled", self.enabled)
            .put("interval", self.interval.as_ref());
        bag
    }
}

impl AttributeMapping for RoutingProtocol {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        let kind = bag.required_string("type")?;
        match kind.as_str() {
            Self::BGP => Ok(Self::Bgp(BgpRoutingProtocol {
                uuid: bag.string("uuid")?,
                href: bag.string("href")?,
                name: bag.string("name")?,
                state: bag.parsed("state")?,
                customer_asn: bag.int("customer_asn")?,
                equinix_asn: bag.int("equinix_asn")?,
                bgp_auth_key: bag.string("bgp_auth_key")?,
                bgp_ipv4: bag.mapped("bgp_ipv4")?,
                bgp_ipv6: bag.mapped("bgp_ipv6")?,
                bfd: bag.mapped("bfd")?,
                operation: bag.mapped("operation")?,
                change: bag.mapped("change")?,
                change_log: bag.mapped("change_log")?,
            })),
            Self::DIRECT => Ok(Self::Direct(DirectRoutingProtocol {
                uuid: bag.string("uuid")?,
                href: bag.string("href")?,
                name: bag.string("name")?,
                state: bag.parsed("state")?,
                direct_ipv4: bag.mapped("direct_ipv4")?,
                direct_ipv6: bag.mapped("direct_ipv6")?,
                operation: bag.mapped("operation")?,
                change: bag.mapped("change")?,
                change_log: bag.mapped("change_log")?,
            })),
            _ => Err(ValidationError::InvalidValue {
                key: "type".into(),
                value: kind,
                reason: "expected BGP or DIRECT".into(),
            }
            .into()),
        }
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.insert("type", self.type_name());
        match self {
            Self::Bgp(p) => {
                bag.put("uuid", p.uuid.as_ref())
                    .put("href", p.href.as_ref())
                    .put("name", p.name.as_ref())
                    .put_display("state", p.state)
                    .put("customer_asn", p.customer_asn)
                    .put("equinix_asn", p.equinix_asn)
                    .put("bgp_auth_key", p.bgp_auth_key.as_ref())
                    .put_block("bgp_ipv4", p.bgp_ipv4.as_ref())
                    .put_block("bgp_ipv6", p.bgp_ipv6.as_ref())
                    .put_block("bfd", p.bfd.as_ref())
                    .put_block("operation", p.operation.as_ref())
                    .put_block("change", p.change.as_ref())
                    .put_block("change_log", p.change_log.as_ref());
            }
            Self::Direct(p) => {
                bag.put("uuid", p.uuid.as_ref())
                    .put("href", p.href.as_ref())
                    .put("name", p.name.as_ref())
                    .put_display("state", p.state)
                    .put_block("direct_ipv4", p.direct_ipv4.as_ref())
                    .put_block("direct_ipv6", p.direct_ipv6.as_ref())
                    .put_block("operation", p.operation.as_ref())
                    .put_block("change", p.change.as_ref())
                    .put_block("change_log", p.change_log.as_ref());
            }
        }
        bag
    }
}

// ── Network ─────────────────────────────────────────────────────────

impl AttributeMapping for Network {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            href: bag.string("href")?,
            name: bag.string("name")?,
            network_type: bag.string("type")?,
            scope: bag.string("scope")?,
            state: bag.parsed("state")?,
            location: bag.mapped("location")?,
            project: bag.mapped("project")?,
            notifications: bag.mapped_list("notifications")?,
            operation: bag.mapped("operation")?,
            change: bag.mapped("change")?,
            change_log: bag.mapped("change_log")?,
            connections_count: bag.int("connections_count")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("href", self.href.as_ref())
            .put("name", self.name.as_ref())
            .put("type", self.network_type.as_ref())
            .put("scope", self.scope.as_ref())
            .put_display("state", self.state)
            .put_block("location", self.location.as_ref())
            .put_block("project", self.project.as_ref())
            .put_blocks("notifications", self.notifications.as_deref())
            .put_block("operation", self.operation.as_ref())
            .put_block("change", self.change.as_ref())
            .put_block("change_log", self.change_log.as_ref())
            .put("connections_count", self.connections_count);
        bag
    }
}

// ── Service profile ─────────────────────────────────────────────────

impl AttributeMapping for ServiceProfile {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            href: bag.string("href")?,
            name: bag.string("name")?,
            profile_type: bag.string("type")?,
            description: bag.string("description")?,
            state: bag.parsed("state")?,
            visibility: bag.string("visibility")?,
            self_profile: bag.boolean("self_profile")?,
            tags: bag.strings("tags")?,
            allowed_emails: bag.strings("allowed_emails")?,
            notifications: bag.mapped_list("notifications")?,
            account: bag.mapped("account")?,
            project: bag.mapped("project")?,
            change_log: bag.mapped("change_log")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("href", self.href.as_ref())
            .put("name", self.name.as_ref())
            .put("type", self.profile_type.as_ref())
            .put("description", self.description.as_ref())
            .put_display("state", self.state)
            .put("visibility", self.visibility.as_ref())
            .put("self_profile", self.self_profile)
            .put("tags", self.tags.as_ref())
            .put("allowed_emails", self.allowed_emails.as_ref())
            .put_blocks("notifications", self.notifications.as_deref())
            .put_block("account", self.account.as_ref())
            .put_block("project", self.project.as_ref())
            .put_block("change_log", self.change_log.as_ref());
        bag
    }
}

// ── Port ────────────────────────────────────────────────────────────

impl AttributeMapping for Encapsulation {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            encapsulation_type: bag.string("type")?,
            tag_protocol_id: bag.string("tag_protocol_id")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("type", self.encapsulation_type.as_ref())
            .put("tag_protocol_id", self.tag_protocol_id.as_ref());
        bag
    }
}

impl AttributeMapping for Port {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            uuid: bag.string("uuid")?,
            href: bag.string("href")?,
            name: bag.string("name")?,
            port_type: bag.string("type")?,
            state: bag.parsed("state")?,
            bandwidth: bag.int("bandwidth")?,
            available_bandwidth: bag.int("available_bandwidth")?,
            used_bandwidth: bag.int("used_bandwidth")?,
            location: bag.mapped("location")?,
            account: bag.mapped("account")?,
            redundancy: bag.mapped("redundancy")?,
            encapsulation: bag.mapped("encapsulation")?,
            operation: bag.mapped("operation")?,
            change_log: bag.mapped("change_log")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("uuid", self.uuid.as_ref())
            .put("href", self.href.as_ref())
            .put("name", self.name.as_ref())
            .put("type", self.port_type.as_ref())
            .put_display("state", self.state)
            .put("bandwidth", self.bandwidth)
            .put("available_bandwidth", self.available_bandwidth)
            .put("used_bandwidth", self.used_bandwidth)
            .put_block("location", self.location.as_ref())
            .put_block("account", self.account.as_ref())
            .put_block("redundancy", self.redundancy.as_ref())
            .put_block("encapsulation", self.encapsulation.as_ref())
            .put_block("operation", self.operation.as_ref())
            .put_block("change_log", self.change_log.as_ref());
        bag
    }
}
