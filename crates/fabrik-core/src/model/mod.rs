// ── Domain model ──
//
// Typed payloads for every resource kind plus the shared nested groups.
// One struct per kind serves as both request and response body; fields
// the server computes are stripped before submission.

pub mod cloud_router;
pub mod common;
pub mod connection;
pub mod descriptor;
pub mod gateway;
pub mod network;
pub mod organization;
pub mod port;
pub mod routing_protocol;
pub mod service_profile;
pub mod state;

pub use cloud_router::CloudRouter;
pub use common::{
    Account, ChangeLog, ErrorAdditionalInfo, Location, Notification, Operation, OperationError,
    Order, Package, Project, Redundancy, RedundancyPriority,
};
pub use connection::{AccessPoint, Connection, ConnectionSide, KeyValue, LinkProtocol, ResourceRef};
pub use descriptor::{LocalResource, ResourceDescriptor, ResourceKind};
pub use gateway::Gateway;
pub use network::Network;
pub use organization::{Address, Organization};
pub use port::{Encapsulation, Port};
pub use routing_protocol::{
    Bfd, BgpAddressFamily, BgpRoutingProtocol, DirectAddress, DirectRoutingProtocol,
    RoutingProtocol,
};
pub use service_profile::ServiceProfile;
pub use state::{ChangeRecord, ChangeStatus, ResourceState};
