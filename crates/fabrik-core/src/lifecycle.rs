// ── Lifecycle orchestrator ──
//
// Drives one resource through create, read, update, delete and search:
// map the local bag to a payload, call the control plane, wait for the
// object to settle, then map the result back into the bag.

use std::time::Duration;

use fabrik_api::Tagged;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{LifecycleConfig, PollSettings, TimeoutBudget};
use crate::error::{CoreError, ValidationError};
use crate::kind::{
    CHANGE_PLAN, ChangeTracking, DeletionCheck, ManagedResource, StatePlan, UpdatePlan,
    plan_update,
};
use crate::model::{ChangeRecord, ChangeStatus, LocalResource, ResourceDescriptor, ResourceState};
use crate::plane::ControlPlane;
use crate::search::RawSearch;
use crate::waiter::{UnexpectedState, WaitSpec, wait_for_state};

/// Attribute holding the flattened results of a search.
pub const SEARCH_RESULTS_KEY: &str = "data";

/// Lifecycle engine over one control plane.
///
/// Operations are sequential per resource. Independent resources may be
/// driven concurrently from the same orchestrator.
pub struct Orchestrator<P> {
    plane: P,
    config: LifecycleConfig,
    cancel: CancellationToken,
    unexpected: UnexpectedState,
    strict_pagination: bool,
}

impl<P: ControlPlane> Orchestrator<P> {
    pub fn new(plane: P, config: LifecycleConfig) -> Self {
        Self {
            plane,
            config,
            cancel: CancellationToken::new(),
            unexpected: UnexpectedState::default(),
            strict_pagination: false,
        }
    }

    /// Abort in-flight waits when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Policy for states outside a wait's pending and target sets.
    pub fn on_unexpected_state(mut self, policy: UnexpectedState) -> Self {
        self.unexpected = policy;
        self
    }

    /// Reject out-of-range pagination before searching.
    pub fn strict_pagination(mut self, strict: bool) -> Self {
        self.strict_pagination = strict;
        self
    }

    pub fn plane(&self) -> &P {
        &self.plane
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Create the object described by `local.attrs`.
    ///
    /// The id is stored as soon as the server returns one, so a failed
    /// wait leaves it in place for the next attempt.
    pub async fn create<K: ManagedResource>(
        &self,
        local: &mut LocalResource,
    ) -> Result<K, CoreError> {
        let profile = K::profile();
        profile.ensure_mutable("create")?;
        let budget = self.budget(self.config.timeouts.create);

        let payload = K::to_remote(&local.attrs)?.request_payload();
        let created: K = self
            .plane
            .create(local.parent_id.as_deref(), &payload)
            .await?;
        let id = created.id().map(str::to_owned).ok_or_else(|| {
            CoreError::Internal(format!("{profile} create response carried no identifier"))
        })?;
        local.id = Some(id.clone());
        info!(kind = %profile, id = %id, "create submitted");

        let desc = descriptor::<K>(local)?;
        let object = self.settle::<K>(&desc, budget.remaining()).await?.value;

        local.attrs.merge(object.to_local());
        Ok(object)
    }

    // ── Read ─────────────────────────────────────────────────────────

    /// Refresh `local.attrs` from the remote object.
    ///
    /// A `NotFound` clears the local id before the error is returned.
    pub async fn read<K: ManagedResource>(
        &self,
        local: &mut LocalResource,
    ) -> Result<K, CoreError> {
        let desc = descriptor::<K>(local)?;
        let timeout = self.config.timeouts.read;

        let fetched = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled { id: desc.id.clone() }),
            res = tokio::time::timeout(timeout, self.plane.get::<K>(&desc)) => {
                res.unwrap_or_else(|_| Err(CoreError::Timeout {
                    id: desc.id.clone(),
                    last_state: ResourceState::Unknown.to_string(),
                    timeout,
                }))
            }
        };

        match fetched {
            Ok(Tagged { value, .. }) => {
                local.attrs.merge(value.to_local());
                Ok(value)
            }
            Err(err) if err.is_not_found() => {
                warn!(kind = %K::profile(), id = %desc.id, "object is gone, clearing local id");
                local.id = None;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    // ── Update ───────────────────────────────────────────────────────

    /// Push the differences between `local.attrs` and the remote object.
    ///
    /// Waits for the object to be stable, submits a replacement or a
    /// patch, waits for the change record (when the kind has one) and
    /// then for the object to settle again. All waits draw on one budget.
    pub async fn update<K: ManagedResource>(
        &self,
        local: &mut LocalResource,
    ) -> Result<K, CoreError> {
        let profile = K::profile();
        profile.ensure_mutable("update")?;
        let desc = descriptor::<K>(local)?;
        let budget = self.budget(self.config.timeouts.update);

        let current = self.settle::<K>(&desc, budget.remaining()).await?;
        let desired = K::to_remote(&local.attrs)?;

        let submitted: K = match plan_update(&desc.id, &current.value, &desired)? {
            UpdatePlan::Replace(doc) => {
                let etag = current.etag.as_deref().filter(|_| profile.uses_etag);
                debug!(id = %desc.id, etag = ?etag, "replacing");
                self.plane.replace(&desc, &doc, etag).await?
            }
            UpdatePlan::Patch(ops) => {
                debug!(id = %desc.id, ops = ops.len(), "patching");
                self.plane.patch(&desc, &ops).await?
            }
        };
        info!(kind = %profile, id = %desc.id, "update submitted");

        if let Some(change_id) = submitted.change().and_then(|c| c.uuid.clone()) {
            self.wait_change::<K>(&desc, &change_id, budget.remaining())
                .await?;
        }
        let object = self.settle::<K>(&desc, budget.remaining()).await?.value;

        local.attrs.merge(object.to_local());
        Ok(object)
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete the remote object and wait until it is gone.
    ///
    /// A delete rejected with one of the kind's idempotent codes counts as
    /// accepted. The local id is cleared only once absence is confirmed.
    pub async fn delete<K: ManagedResource>(
        &self,
        local: &mut LocalResource,
    ) -> Result<(), CoreError> {
        let profile = K::profile();
        profile.ensure_mutable("delete")?;
        let desc = descriptor::<K>(local)?;
        let budget = self.budget(self.config.timeouts.delete);

        match self.plane.delete::<K>(&desc).await {
            Ok(()) => info!(kind = %profile, id = %desc.id, "delete submitted"),
            Err(err) if err.is_already_deleted() => {
                warn!(kind = %profile, id = %desc.id, error = %err, "delete conflict, treating as already deleted");
            }
            Err(err) => return Err(err),
        }

        let spec = match profile.deletion {
            DeletionCheck::Absent => WaitSpec::new(
                Vec::new(),
                vec![ResourceState::Absent],
                budget.remaining(),
                self.poll::<K>(),
            )?,
            DeletionCheck::States(plan) => {
                let mut target = plan.target.to_vec();
                target.push(ResourceState::Absent);
                WaitSpec::new(
                    plan.pending.to_vec(),
                    target,
                    budget.remaining(),
                    self.poll::<K>(),
                )?
                .with_failure(plan.failure.to_vec())
                .on_unexpected(self.unexpected)
            }
        };

        let plane = &self.plane;
        let target = &desc;
        wait_for_state(&desc.id, &spec, &self.cancel, move || async move {
            match plane.get::<K>(target).await {
                Ok(fetched) => Ok(((), observed_state(&fetched.value))),
                Err(err) if err.is_not_found() => Ok(((), ResourceState::Absent)),
                Err(err) => Err(err),
            }
        })
        .await?;

        local.id = None;
        info!(kind = %profile, id = %desc.id, "deleted");
        Ok(())
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Run the search described by the bag's `filter`, `sort` and
    /// `pagination` groups.
    ///
    /// Results are flattened into [`SEARCH_RESULTS_KEY`] and the local id
    /// is set to the first match. No match is an error.
    pub async fn search<K: ManagedResource>(
        &self,
        local: &mut LocalResource,
    ) -> Result<Vec<K>, CoreError> {
        let profile = K::profile();
        let builder = profile
            .search_builder()?
            .strict_pagination(self.strict_pagination);
        let request = builder.build_from(&RawSearch::from_attributes(&local.attrs)?)?;

        let results: Vec<K> = self
            .plane
            .search(local.parent_id.as_deref(), &request)
            .await?;
        let Some(first) = results.first() else {
            return Err(CoreError::NoRecords {
                kind: profile.kind.to_string(),
            });
        };
        if let Some(id) = first.id() {
            local.id = Some(id.to_owned());
        }
        debug!(kind = %profile, matches = results.len(), "search complete");

        local.attrs.insert(
            SEARCH_RESULTS_KEY,
            results.iter().map(K::to_local).collect::<Vec<_>>(),
        );
        Ok(results)
    }

    // ── Waits ────────────────────────────────────────────────────────

    /// Wait for the kind's provisioning target, or fetch once when the
    /// kind has no provisioning states.
    async fn settle<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        timeout: Duration,
    ) -> Result<Tagged<K>, CoreError> {
        match &K::profile().provisioning {
            Some(plan) => self.wait_stable::<K>(desc, plan, timeout).await,
            None => self.plane.get::<K>(desc).await,
        }
    }

    async fn wait_stable<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        plan: &StatePlan<ResourceState>,
        timeout: Duration,
    ) -> Result<Tagged<K>, CoreError> {
        let spec = WaitSpec::new(
            plan.pending.to_vec(),
            plan.target.to_vec(),
            timeout,
            self.poll::<K>(),
        )?
        .with_failure(plan.failure.to_vec())
        .on_unexpected(self.unexpected);

        let plane = &self.plane;
        wait_for_state(&desc.id, &spec, &self.cancel, move || async move {
            let fetched = plane.get::<K>(desc).await?;
            let state = observed_state(&fetched.value);
            Ok((fetched, state))
        })
        .await
    }

    async fn wait_change<K: ManagedResource>(
        &self,
        desc: &ResourceDescriptor,
        change_id: &str,
        timeout: Duration,
    ) -> Result<(), CoreError> {
        let spec = WaitSpec::new(
            CHANGE_PLAN.pending.to_vec(),
            CHANGE_PLAN.target.to_vec(),
            timeout,
            self.poll::<K>(),
        )?
        .with_failure(CHANGE_PLAN.failure.to_vec())
        .on_unexpected(self.unexpected);

        let plane = &self.plane;
        match K::profile().change_tracking {
            ChangeTracking::None => Ok(()),
            ChangeTracking::Embedded => {
                wait_for_state(change_id, &spec, &self.cancel, move || async move {
                    let fetched = plane.get::<K>(desc).await?;
                    let status = fetched
                        .value
                        .change()
                        .map_or(ChangeStatus::Unknown, ChangeRecord::status_or_unknown);
                    Ok(((), status))
                })
                .await
            }
            ChangeTracking::Endpoint => {
                wait_for_state(change_id, &spec, &self.cancel, move || async move {
                    let record = plane.get_change::<K>(desc, change_id).await?;
                    Ok(((), record.status_or_unknown()))
                })
                .await
            }
        }
    }

    fn budget(&self, total: Duration) -> TimeoutBudget {
        TimeoutBudget::start(total, self.config.safety_margin)
    }

    fn poll<K: ManagedResource>(&self) -> PollSettings {
        K::profile().poll_settings(self.config.polling)
    }
}

fn descriptor<K: ManagedResource>(
    local: &LocalResource,
) -> Result<ResourceDescriptor, ValidationError> {
    let kind = K::profile().kind;
    local
        .descriptor(kind)
        .ok_or_else(|| ValidationError::MissingIdentifier {
            kind: kind.to_string(),
        })
}

fn observed_state<K: ManagedResource>(object: &K) -> ResourceState {
    object.state().unwrap_or(ResourceState::Unknown)
}
