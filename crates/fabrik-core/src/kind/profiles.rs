use std::time::Duration;

use super::{
    ChangeTracking, DeletionCheck, KindProfile, ManagedResource, StatePlan, UpdateStyle,
};
use crate::config::PollSettings;
use crate::model::{
    BgpRoutingProtocol, ChangeRecord, CloudRouter, Connection, DirectRoutingProtocol, Gateway,
    Network, Organization, Port, ResourceKind, ResourceState, RoutingProtocol, ServiceProfile,
};

use crate::model::ResourceState::{
    Active, Deleted, Deprovisioned, Deprovisioning, Failed, Pending, PendingInterfaceConfiguration,
    Provisioned, Provisioning, Reprovisioning,
};

const UPDATED_AT: &str = "/changeLog/updatedDateTime";

const DEPROVISION: DeletionCheck = DeletionCheck::States(StatePlan {
    pending: &[Deprovisioning],
    target: &[Deprovisioned],
    failure: &[],
});

pub static CLOUD_ROUTER: KindProfile = KindProfile {
    kind: ResourceKind::CloudRouter,
    collection: "fabric/v4/routers",
    default_sort: Some(UPDATED_AT),
    idempotent_delete_codes: &["EQ-3040055"],
    provisioning: Some(StatePlan {
        pending: &[Provisioning, Reprovisioning],
        target: &[Provisioned],
        failure: &[Failed],
    }),
    deletion: DEPROVISION,
    change_tracking: ChangeTracking::None,
    update: UpdateStyle::Patch(&["/name", "/package/code"]),
    uses_etag: false,
    poll: None,
    mutable: true,
};

pub static GATEWAY: KindProfile = KindProfile {
    kind: ResourceKind::Gateway,
    collection: "fabric/v4/gateways",
    default_sort: Some(UPDATED_AT),
    idempotent_delete_codes: &["EQ-3040055"],
    provisioning: Some(StatePlan {
        pending: &[Provisioning, Reprovisioning],
        target: &[PendingInterfaceConfiguration, Provisioned],
        failure: &[Failed],
    }),
    deletion: DEPROVISION,
    change_tracking: ChangeTracking::None,
    update: UpdateStyle::Patch(&["/name"]),
    uses_etag: false,
    poll: None,
    mutable: true,
};

pub static CONNECTION: KindProfile = KindProfile {
    kind: ResourceKind::Connection,
    collection: "fabric/v4/connections",
    default_sort: Some(UPDATED_AT),
    idempotent_delete_codes: &["EQ-3142509"],
    provisioning: Some(StatePlan {
        pending: &[Provisioning, Reprovisioning],
        target: &[Pending, Provisioned, Active],
        failure: &[Failed],
    }),
    deletion: DeletionCheck::States(StatePlan {
        pending: &[Deprovisioning, Active, Pending],
        target: &[Deprovisioned],
        failure: &[],
    }),
    change_tracking: ChangeTracking::Embedded,
    update: UpdateStyle::Patch(&["/name", "/bandwidth"]),
    uses_etag: false,
    poll: None,
    mutable: true,
};

pub static ROUTING_PROTOCOL: KindProfile = KindProfile {
    kind: ResourceKind::RoutingProtocol,
    collection: "fabric/v4/connections/{parent}/routingProtocols",
    default_sort: None,
    idempotent_delete_codes: &["EQ-3041121"],
    provisioning: Some(StatePlan {
        pending: &[Provisioning, Reprovisioning],
        target: &[Provisioned],
        failure: &[],
    }),
    deletion: DeletionCheck::Absent,
    change_tracking: ChangeTracking::Endpoint,
    update: UpdateStyle::Replace,
    uses_etag: false,
    poll: None,
    mutable: true,
};

pub static NETWORK: KindProfile = KindProfile {
    kind: ResourceKind::Network,
    collection: "fabric/v4/networks",
    default_sort: Some(UPDATED_AT),
    idempotent_delete_codes: &["EQ-3040055"],
    provisioning: Some(StatePlan {
        pending: &[Provisioning],
        target: &[Provisioned],
        failure: &[],
    }),
    deletion: DEPROVISION,
    change_tracking: ChangeTracking::Embedded,
    update: UpdateStyle::Patch(&["/name"]),
    uses_etag: false,
    poll: None,
    mutable: true,
};

pub static SERVICE_PROFILE: KindProfile = KindProfile {
    kind: ResourceKind::ServiceProfile,
    collection: "fabric/v4/serviceProfiles",
    default_sort: Some(UPDATED_AT),
    idempotent_delete_codes: &[],
    provisioning: Some(StatePlan {
        pending: &[Pending],
        target: &[Active],
        failure: &[],
    }),
    deletion: DeletionCheck::States(StatePlan {
        pending: &[Active],
        target: &[Deleted],
        failure: &[],
    }),
    change_tracking: ChangeTracking::None,
    update: UpdateStyle::Replace,
    uses_etag: true,
    poll: Some(PollSettings {
        delay: Duration::from_secs(10),
        min_interval: Duration::from_secs(10),
    }),
    mutable: true,
};

pub static PORT: KindProfile = KindProfile {
    kind: ResourceKind::Port,
    collection: "fabric/v4/ports",
    default_sort: Some(UPDATED_AT),
    idempotent_delete_codes: &[],
    provisioning: None,
    deletion: DeletionCheck::Absent,
    change_tracking: ChangeTracking::None,
    update: UpdateStyle::Replace,
    uses_etag: false,
    poll: None,
    mutable: false,
};

pub static ORGANIZATION: KindProfile = KindProfile {
    kind: ResourceKind::Organization,
    collection: "metal/v1/organizations",
    default_sort: None,
    idempotent_delete_codes: &[],
    provisioning: None,
    deletion: DeletionCheck::Absent,
    change_tracking: ChangeTracking::None,
    update: UpdateStyle::Replace,
    uses_etag: false,
    poll: None,
    mutable: true,
};

// ── Typed payloads ──────────────────────────────────────────────────

impl ManagedResource for CloudRouter {
    fn profile() -> &'static KindProfile {
        &CLOUD_ROUTER
    }

    fn id(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn state(&self) -> Option<ResourceState> {
        self.state
    }

    fn request_payload(&self) -> Self {
        Self {
            uuid: None,
            href: None,
            state: None,
            equinix_asn: None,
            change_log: None,
            connections_count: None,
            bgp_ipv4_routes_count: None,
            bgp_ipv6_routes_count: None,
            ..self.clone()
        }
    }
}

impl ManagedResource for Gateway {
    fn profile() -> &'static KindProfile {
        &GATEWAY
    }

    fn id(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn state(&self) -> Option<ResourceState> {
        self.state
    }

    fn request_payload(&self) -> Self {
        Self {
            uuid: None,
            href: None,
            state: None,
            change_log: None,
            ..self.clone()
        }
    }
}

impl ManagedResource for Connection {
    fn profile() -> &'static KindProfile {
        &CONNECTION
    }

    fn id(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn state(&self) -> Option<ResourceState> {
        self.state
    }

    fn change(&self) -> Option<&ChangeRecord> {
        self.change.as_ref()
    }

    fn request_payload(&self) -> Self {
        Self {
            uuid: None,
            href: None,
            state: None,
            operation: None,
            change: None,
            change_log: None,
            ..self.clone()
        }
    }
}

impl ManagedResource for RoutingProtocol {
    fn profile() -> &'static KindProfile {
        &ROUTING_PROTOCOL
    }

    fn id(&self) -> Option<&str> {
        self.uuid()
    }

    fn state(&self) -> Option<ResourceState> {
        RoutingProtocol::state(self)
    }

    fn change(&self) -> Option<&ChangeRecord> {
        RoutingProtocol::change(self)
    }

    fn request_payload(&self) -> Self {
        match self.clone() {
            Self::Bgp(p) => Self::Bgp(BgpRoutingProtocol {
                uuid: None,
                href: None,
                state: None,
                equinix_asn: None,
                operation: None,
                change: None,
                change_log: None,
                ..p
            }),
            Self::Direct(p) => Self::Direct(DirectRoutingProtocol {
                uuid: None,
                href: None,
                state: None,
                operation: None,
                change: None,
                change_log: None,
                ..p
            }),
        }
    }
}

impl ManagedResource for Network {
    fn profile() -> &'static KindProfile {
        &NETWORK
    }

    fn id(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Networks report provisioning progress in `operation.equinixStatus`.
    fn state(&self) -> Option<ResourceState> {
        let status = self.operation.as_ref()?.equinix_status.as_deref()?;
        Some(status.parse().unwrap_or(ResourceState::Unknown))
    }

    fn change(&self) -> Option<&ChangeRecord> {
        self.change.as_ref()
    }

    fn request_payload(&self) -> Self {
        Self {
            uuid: None,
            href: None,
            state: None,
            operation: None,
            change: None,
            change_log: None,
            connections_count: None,
            ..self.clone()
        }
    }
}

impl ManagedResource for ServiceProfile {
    fn profile() -> &'static KindProfile {
        &SERVICE_PROFILE
    }

    fn id(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn state(&self) -> Option<ResourceState> {
        self.state
    }

    fn request_payload(&self) -> Self {
        Self {
            uuid: None,
            href: None,
            state: None,
            change_log: None,
            ..self.clone()
        }
    }
}

impl ManagedResource for Port {
    fn profile() -> &'static KindProfile {
        &PORT
    }

    fn id(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    fn state(&self) -> Option<ResourceState> {
        self.state
    }

    fn request_payload(&self) -> Self {
        self.clone()
    }
}

impl ManagedResource for Organization {
    fn profile() -> &'static KindProfile {
        &ORGANIZATION
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn state(&self) -> Option<ResourceState> {
        None
    }

    fn request_payload(&self) -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
            ..self.clone()
        }
    }
}
