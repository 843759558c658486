// ── Resource identity ──
//
// `ResourceDescriptor` names one remote object; `LocalResource` is the
// caller-owned record the orchestrator keeps in sync with it.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::attrs::AttributeBag;

/// Every resource kind the engine manages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    CloudRouter,
    Gateway,
    Connection,
    RoutingProtocol,
    Network,
    ServiceProfile,
    Port,
    Organization,
}

/// Identity of one remote object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    pub id: String,
    pub kind: ResourceKind,
    /// Owning object for nested kinds (the connection of a routing protocol).
    pub parent_id: Option<String>,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent_id {
            Some(parent) => write!(f, "{}/{parent}/{}", self.kind, self.id),
            None => write!(f, "{}/{}", self.kind, self.id),
        }
    }
}

/// Caller-owned local state for one resource.
///
/// `id` is `None` until a create succeeds and again once a delete has been
/// confirmed (or a read found the object gone).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalResource {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub attrs: AttributeBag,
}

impl LocalResource {
    pub fn new(attrs: AttributeBag) -> Self {
        Self {
            id: None,
            parent_id: None,
            attrs,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Descriptor for the tracked object, if there is one.
    pub fn descriptor(&self, kind: ResourceKind) -> Option<ResourceDescriptor> {
        self.id
            .as_ref()
            .map(|id| ResourceDescriptor::new(kind, id.clone()).with_parent(self.parent_id.clone()))
    }
}
