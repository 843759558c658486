// ── Control plane seam ──
//
// The orchestrator talks to the remote side only through `ControlPlane`.
// `FabricClient` implements it over HTTP; tests substitute scripted
// doubles. Every error leaving an implementation is already classified.

use std::future::Future;

use fabrik_api::{FabricClient, PatchOperation, Tagged};
use tracing::debug;

use crate::error::CoreError;
use crate::kind::ManagedResource;
use crate::model::{ChangeRecord, ResourceDescriptor};
use crate::search::SearchRequest;

/// Remote operations, generic over the resource kind.
///
/// The kind's [`KindProfile`](crate::kind::KindProfile) supplies paths and
/// the idempotent delete codes used for classification.
pub trait ControlPlane: Send + Sync {
    fn create<K: ManagedResource>(
        &self,
        parent: Option<&str>,
        payload: &K,
    ) -> impl Future<Output = Result<K, CoreError>> + Send;

    /// Fetch one object and its `ETag`.
    fn get<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
    ) -> impl Future<Output = Result<Tagged<K>, CoreError>> + Send;

    fn replace<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        payload: &K,
        etag: Option<&str>,
    ) -> impl Future<Output = Result<K, CoreError>> + Send;

    fn patch<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        ops: &[PatchOperation],
    ) -> impl Future<Output = Result<K, CoreError>> + Send;

    fn delete<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// One page of matches.
    fn search<K: ManagedResource>(
        &self,
        parent: Option<&str>,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<K>, CoreError>> + Send;

    fn get_change<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        change_id: &str,
    ) -> impl Future<Output = Result<ChangeRecord, CoreError>> + Send;
}

/// Delete is the only call where the kind's idempotent codes apply; every
/// other call classifies on status alone.
fn delete_classified<K: ManagedResource>(err: &fabrik_api::Error) -> CoreError {
    CoreError::from_api(err, K::profile().idempotent_delete_codes)
}

impl ControlPlane for FabricClient {
    async fn create<K: ManagedResource>(
        &self,
        parent: Option<&str>,
        payload: &K,
    ) -> Result<K, CoreError> {
        let collection = K::profile().collection_path(parent)?;
        FabricClient::create(self, &collection, payload)
            .await
            .map_err(CoreError::from)
    }

    async fn get<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
    ) -> Result<Tagged<K>, CoreError> {
        let item = K::profile().item_path(desc)?;
        FabricClient::get(self, &item)
            .await
            .map_err(CoreError::from)
    }

    async fn replace<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        payload: &K,
        etag: Option<&str>,
    ) -> Result<K, CoreError> {
        let item = K::profile().item_path(desc)?;
        FabricClient::replace(self, &item, payload, etag)
            .await
            .map_err(CoreError::from)
    }

    async fn patch<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        ops: &[PatchOperation],
    ) -> Result<K, CoreError> {
        let item = K::profile().item_path(desc)?;
        FabricClient::patch(self, &item, ops)
            .await
            .map_err(CoreError::from)
    }

    async fn delete<K: ManagedResource>(&self, desc: &ResourceDescriptor) -> Result<(), CoreError> {
        let item = K::profile().item_path(desc)?;
        FabricClient::delete(self, &item)
            .await
            .map_err(|err| delete_classified::<K>(&err))
    }

    async fn search<K: ManagedResource>(
        &self,
        parent: Option<&str>,
        request: &SearchRequest,
    ) -> Result<Vec<K>, CoreError> {
        let collection = K::profile().collection_path(parent)?;
        let page = FabricClient::search::<_, K>(self, &collection, request)
            .await
            .map_err(CoreError::from)?;
        if let Some(p) = &page.pagination {
            debug!(total = p.total, returned = page.data.len(), "search page");
        }
        Ok(page.data)
    }

    async fn get_change<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        change_id: &str,
    ) -> Result<ChangeRecord, CoreError> {
        let item = K::profile().item_path(desc)?;
        FabricClient::get_change(self, &item, change_id)
            .await
            .map(ChangeRecord::from)
            .map_err(CoreError::from)
    }
}
