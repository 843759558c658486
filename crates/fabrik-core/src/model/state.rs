// ── Lifecycle states ──
//
// Remote objects report a coarse lifecycle state; asynchronous updates
// report a change status. Both are closed enums with an `Unknown`
// catch-all so a new server value never breaks deserialization.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state reported by the control plane.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ResourceState {
    Pending,
    Provisioning,
    Reprovisioning,
    Provisioned,
    PendingInterfaceConfiguration,
    Active,
    Inactive,
    Deprovisioning,
    Deprovisioned,
    Deleting,
    Deleted,
    NotProvisioned,
    Failed,
    /// The object no longer exists (HTTP 404). Never sent by the server.
    #[serde(skip)]
    Absent,
    #[serde(other)]
    Unknown,
}

impl ResourceState {
    /// Whether this state is a transitional (in-progress) state.
    pub fn is_transitional(self) -> bool {
        matches!(
            self,
            Self::Pending
                | Self::Provisioning
                | Self::Reprovisioning
                | Self::Deprovisioning
                | Self::Deleting
        )
    }

    /// Whether the object is gone for good.
    pub fn is_gone(self) -> bool {
        matches!(self, Self::Absent | Self::Deprovisioned | Self::Deleted)
    }
}

/// Status of an asynchronous change request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ChangeStatus {
    Requested,
    Approved,
    Completed,
    Failed,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ChangeStatus {
    pub fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Rejected)
    }
}

/// An asynchronous update sub-operation.
///
/// Embedded in some resource bodies (`change`) and served on its own by
/// `GET {resource}/changes/{uuid}` for others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChangeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date_time: Option<String>,
}

impl ChangeRecord {
    pub fn status_or_unknown(&self) -> ChangeStatus {
        self.status.unwrap_or(ChangeStatus::Unknown)
    }
}

impl From<fabrik_api::ChangeResponse> for ChangeRecord {
    fn from(resp: fabrik_api::ChangeResponse) -> Self {
        Self {
            uuid: resp.uuid,
            change_type: resp.change_type,
            status: resp
                .status
                .map(|s| s.parse().unwrap_or(ChangeStatus::Unknown)),
            created_date_time: resp.created_date_time,
            updated_date_time: resp.updated_date_time,
        }
    }
}
