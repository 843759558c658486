// ── Resource kinds ──
//
// Everything the orchestrator needs to know about one kind lives in its
// `KindProfile`: where it lives, how it is searched, which delete errors
// mean "already gone", which states to wait for and how updates are
// submitted. `ManagedResource` ties a typed payload to its profile.

mod profiles;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use fabrik_api::PatchOperation;

use crate::config::PollSettings;
use crate::convert::AttributeMapping;
use crate::error::{CoreError, ValidationError};
use crate::model::{ChangeRecord, ChangeStatus, ResourceDescriptor, ResourceKind, ResourceState};
use crate::search::SearchQueryBuilder;

pub use profiles::{
    CLOUD_ROUTER, CONNECTION, GATEWAY, NETWORK, ORGANIZATION, PORT, ROUTING_PROTOCOL,
    SERVICE_PROFILE,
};

const PARENT_PLACEHOLDER: &str = "{parent}";

/// Pending, target and failure states for one wait.
#[derive(Debug, Clone, Copy)]
pub struct StatePlan<S: 'static> {
    pub pending: &'static [S],
    pub target: &'static [S],
    pub failure: &'static [S],
}

/// Change requests share one plan across kinds.
pub const CHANGE_PLAN: StatePlan<ChangeStatus> = StatePlan {
    pending: &[ChangeStatus::Requested, ChangeStatus::Approved],
    target: &[ChangeStatus::Completed],
    failure: &[ChangeStatus::Failed, ChangeStatus::Rejected],
};

/// How a delete is confirmed.
#[derive(Debug, Clone, Copy)]
pub enum DeletionCheck {
    /// Poll until the object returns 404.
    Absent,
    /// Poll the state field; a 404 also counts as gone.
    States(StatePlan<ResourceState>),
}

/// Where the status of an asynchronous update is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTracking {
    None,
    /// `change` block of the resource body itself.
    Embedded,
    /// `GET {item}/changes/{uuid}`.
    Endpoint,
}

/// How an update is submitted.
#[derive(Debug, Clone, Copy)]
pub enum UpdateStyle {
    /// Full-document `PUT`.
    Replace,
    /// `PATCH` with one `replace` op per changed JSON pointer.
    Patch(&'static [&'static str]),
}

/// Static per-kind table.
#[derive(Debug)]
pub struct KindProfile {
    pub kind: ResourceKind,
    /// Collection path; nested kinds embed `{parent}`.
    pub collection: &'static str,
    /// Default sort column. `None` when the kind has no search endpoint.
    pub default_sort: Option<&'static str>,
    pub idempotent_delete_codes: &'static [&'static str],
    /// States to wait for after create and around updates. `None` means
    /// the object is usable as soon as the call returns.
    pub provisioning: Option<StatePlan<ResourceState>>,
    pub deletion: DeletionCheck,
    pub change_tracking: ChangeTracking,
    pub update: UpdateStyle,
    /// Guard replacements with the `ETag` of the last fetch.
    pub uses_etag: bool,
    /// Replaces the configured poll cadence for this kind.
    pub poll: Option<PollSettings>,
    /// `false` for kinds that are only read and searched.
    pub mutable: bool,
}

impl KindProfile {
    /// Collection path with the parent id filled in.
    pub fn collection_path(&self, parent: Option<&str>) -> Result<String, ValidationError> {
        if !self.collection.contains(PARENT_PLACEHOLDER) {
            return Ok(self.collection.to_owned());
        }
        match parent {
            Some(parent) if !parent.is_empty() => {
                Ok(self.collection.replace(PARENT_PLACEHOLDER, parent))
            }
            _ => Err(ValidationError::MissingAttribute {
                key: "parent_id".into(),
            }),
        }
    }

    pub fn item_path(&self, desc: &ResourceDescriptor) -> Result<String, ValidationError> {
        let collection = self.collection_path(desc.parent_id.as_deref())?;
        Ok(format!("{collection}/{}", desc.id))
    }

    /// Query builder seeded with this kind's default sort column.
    pub fn search_builder(&self) -> Result<SearchQueryBuilder, ValidationError> {
        self.default_sort
            .map(SearchQueryBuilder::new)
            .ok_or_else(|| self.unsupported("search"))
    }

    pub fn poll_settings(&self, configured: PollSettings) -> PollSettings {
        self.poll.unwrap_or(configured)
    }

    pub fn ensure_mutable(&self, operation: &'static str) -> Result<(), ValidationError> {
        if self.mutable {
            Ok(())
        } else {
            Err(self.unsupported(operation))
        }
    }

    pub fn unsupported(&self, operation: &'static str) -> ValidationError {
        ValidationError::Unsupported {
            kind: self.kind.to_string(),
            operation,
        }
    }
}

impl fmt::Display for KindProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_ref())
    }
}

/// A typed payload the orchestrator can drive through its lifecycle.
pub trait ManagedResource:
    AttributeMapping + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    fn profile() -> &'static KindProfile;

    /// Server-assigned identifier.
    fn id(&self) -> Option<&str>;

    /// Lifecycle state; kinds without one report `None`.
    fn state(&self) -> Option<ResourceState>;

    /// Change record embedded in the body, if the kind reports one.
    fn change(&self) -> Option<&ChangeRecord> {
        None
    }

    /// Copy with every server-computed field cleared.
    fn request_payload(&self) -> Self;
}

/// An update ready for submission.
#[derive(Debug, Clone)]
pub enum UpdatePlan<K> {
    Replace(K),
    Patch(Vec<PatchOperation>),
}

/// Diff `current` against `desired` according to the kind's update style.
///
/// Fields absent from `desired` keep their current value. An empty diff
/// is [`CoreError::NothingToUpdate`].
pub fn plan_update<K: ManagedResource>(
    id: &str,
    current: &K,
    desired: &K,
) -> Result<UpdatePlan<K>, CoreError> {
    let current = to_json(&current.request_payload())?;
    let desired = to_json(&desired.request_payload())?;

    match K::profile().update {
        UpdateStyle::Replace => {
            let mut merged = current.clone();
            overlay(&mut merged, desired);
            if merged == current {
                return Err(nothing_to_update(id));
            }
            serde_json::from_value(merged)
                .map(UpdatePlan::Replace)
                .map_err(|e| CoreError::Internal(format!("rebuilding {id}: {e}")))
        }
        UpdateStyle::Patch(paths) => {
            let ops: Vec<PatchOperation> = paths
                .iter()
                .filter_map(|path| {
                    let wanted = desired.pointer(path).filter(|v| !v.is_null())?;
                    (current.pointer(path) != Some(wanted))
                        .then(|| PatchOperation::replace(*path, wanted.clone()))
                })
                .collect();
            if ops.is_empty() {
                return Err(nothing_to_update(id));
            }
            Ok(UpdatePlan::Patch(ops))
        }
    }
}

fn to_json<K: Serialize>(value: &K) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(e.to_string()))
}

fn nothing_to_update(id: &str) -> CoreError {
    CoreError::NothingToUpdate { id: id.to_owned() }
}

/// Recursive JSON merge; objects merge key by key, anything else is
/// replaced by `top`.
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                overlay(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, top) => *base = top,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{CloudRouter, Package, RoutingProtocol, ServiceProfile};

    #[test]
    fn nested_collection_needs_parent() {
        let path = ROUTING_PROTOCOL.collection_path(Some("conn-1")).unwrap();
        assert_eq!(path, "fabric/v4/connections/conn-1/routingProtocols");

        let err = ROUTING_PROTOCOL.collection_path(None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingAttribute {
                key: "parent_id".into()
            }
        );

        let desc = ResourceDescriptor::new(ResourceKind::CloudRouter, "cr-1");
        assert_eq!(CLOUD_ROUTER.item_path(&desc).unwrap(), "fabric/v4/routers/cr-1");
    }

    #[test]
    fn ports_are_read_only() {
        let err = PORT.ensure_mutable("delete").unwrap_err();
        assert_eq!(err.to_string(), "delete is not supported for port");
        assert!(PORT.search_builder().is_ok());
        assert!(ORGANIZATION.search_builder().is_err());
    }

    #[test]
    fn patch_plan_lists_changed_paths_only() {
        let current = CloudRouter {
            uuid: Some("cr-1".into()),
            name: Some("old".into()),
            package: Some(Package {
                code: Some("STANDARD".into()),
            }),
            ..Default::default()
        };
        let desired = CloudRouter {
            name: Some("new".into()),
            package: Some(Package {
                code: Some("STANDARD".into()),
            }),
            ..Default::default()
        };

        let UpdatePlan::Patch(ops) = plan_update("cr-1", &current, &desired).unwrap() else {
            panic!("cloud routers patch");
        };
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path, "/name");
        assert_eq!(ops[0].value, json!("new"));
    }

    #[test]
    fn identical_desired_state_is_nothing_to_update() {
        let current = CloudRouter {
            name: Some("same".into()),
            ..Default::default()
        };
        let err = plan_update("cr-1", &current, &current.clone()).unwrap_err();
        assert!(matches!(err, CoreError::NothingToUpdate { .. }));
    }

    #[test]
    fn replace_plan_overlays_desired_on_current() {
        let current = ServiceProfile {
            uuid: Some("sp-1".into()),
            name: Some("profile".into()),
            description: Some("old".into()),
            tags: Some(vec!["a".into()]),
            ..Default::default()
        };
        let desired = ServiceProfile {
            description: Some("new".into()),
            ..Default::default()
        };

        let UpdatePlan::Replace(doc) = plan_update("sp-1", &current, &desired).unwrap() else {
            panic!("service profiles replace");
        };
        assert_eq!(doc.uuid, None);
        assert_eq!(doc.name.as_deref(), Some("profile"));
        assert_eq!(doc.description.as_deref(), Some("new"));
        assert_eq!(doc.tags, Some(vec!["a".to_owned()]));
    }

    #[test]
    fn replace_plan_keeps_routing_protocol_shape() {
        let current: RoutingProtocol = serde_json::from_value(json!({
            "type": "DIRECT",
            "uuid": "rp-1",
            "state": "PROVISIONED",
            "directIpv4": { "equinixIfaceIp": "10.0.0.1/30" }
        }))
        .unwrap();
        let desired: RoutingProtocol = serde_json::from_value(json!({
            "type": "DIRECT",
            "directIpv4": { "equinixIfaceIp": "10.0.0.5/30" }
        }))
        .unwrap();

        let UpdatePlan::Replace(doc) = plan_update("rp-1", &current, &desired).unwrap() else {
            panic!("routing protocols replace");
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "DIRECT",
                "directIpv4": { "equinixIfaceIp": "10.0.0.5/30" }
            })
        );
    }
}
