// fabrik-core: Reconciliation engine for Fabric and Metal resources.
//
// Maps a local attribute bag to typed payloads and back, builds search
// queries, polls asynchronous operations to completion and orchestrates
// the lifecycle of every resource kind through the `ControlPlane` seam.

pub mod attrs;
pub mod config;
pub mod convert;
pub mod error;
pub mod kind;
pub mod lifecycle;
pub mod model;
pub mod plane;
pub mod search;
pub mod waiter;

// ── Primary re-exports ──────────────────────────────────────────────

pub use attrs::{AttrValue, AttributeBag};
pub use config::{LifecycleConfig, OperationTimeouts, PollSettings, TimeoutBudget};
pub use convert::AttributeMapping;
pub use error::{CoreError, ErrorClass, ValidationError};
pub use kind::{KindProfile, ManagedResource, UpdatePlan};
pub use lifecycle::Orchestrator;
pub use plane::ControlPlane;
pub use search::{SearchQueryBuilder, SearchRequest};
pub use waiter::{UnexpectedState, WaitSpec, wait_for_state};

pub use model::{
    ChangeRecord, ChangeStatus, CloudRouter, Connection, Gateway, LocalResource, Network,
    Organization, Port, ResourceDescriptor, ResourceKind, ResourceState, RoutingProtocol,
    ServiceProfile,
};

pub use tokio_util::sync::CancellationToken;
