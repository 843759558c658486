// ── State reconciler ──
//
// Polls a refresh function until the observed state reaches a target,
// hits a failure state, runs out of time or is cancelled. One generic
// loop serves every kind and every lifecycle phase.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PollSettings;
use crate::error::{CoreError, ValidationError};

/// Reported as the last state when the deadline passes before any refresh.
const NOT_OBSERVED: &str = "UNKNOWN";

/// What to do with a state that is neither pending, target nor failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnexpectedState {
    /// Keep polling until the deadline.
    #[default]
    KeepPolling,
    /// Abort with [`CoreError::UnexpectedState`].
    Fail,
}

/// Parameters of one wait.
#[derive(Debug, Clone)]
pub struct WaitSpec<S> {
    pending: Vec<S>,
    target: Vec<S>,
    failure: Vec<S>,
    unexpected: UnexpectedState,
    timeout: Duration,
    poll: PollSettings,
}

impl<S: PartialEq + fmt::Display> WaitSpec<S> {
    /// `pending` and `target` must not overlap.
    pub fn new(
        pending: Vec<S>,
        target: Vec<S>,
        timeout: Duration,
        poll: PollSettings,
    ) -> Result<Self, ValidationError> {
        if let Some(both) = pending.iter().find(|s| target.contains(s)) {
            return Err(ValidationError::OverlappingStates {
                state: both.to_string(),
            });
        }
        Ok(Self {
            pending,
            target,
            failure: Vec::new(),
            unexpected: UnexpectedState::default(),
            timeout,
            poll,
        })
    }

    /// States that end the wait with [`CoreError::TerminalState`].
    pub fn with_failure(mut self, failure: Vec<S>) -> Self {
        self.failure = failure;
        self
    }

    pub fn on_unexpected(mut self, policy: UnexpectedState) -> Self {
        self.unexpected = policy;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll(&self) -> PollSettings {
        self.poll
    }
}

/// Poll `refresh` until its state is in the target set.
///
/// Sleeps `poll.delay` before the first refresh and exactly
/// `poll.min_interval` between refreshes. A refresh error is returned
/// unchanged. The deadline counts from the call; when it falls before the
/// next allowed refresh the wait times out with the last observed state
/// rather than polling early.
pub async fn wait_for_state<T, S, F, Fut>(
    id: &str,
    spec: &WaitSpec<S>,
    cancel: &CancellationToken,
    mut refresh: F,
) -> Result<T, CoreError>
where
    S: PartialEq + fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(T, S), CoreError>>,
{
    let started = Instant::now();
    let deadline = started + spec.timeout;
    let mut polls: u32 = 0;

    debug!(
        id,
        timeout_secs = spec.timeout.as_secs(),
        "waiting for target state"
    );
    if spec.poll.delay > spec.timeout {
        return Err(timed_out(id, &NOT_OBSERVED, spec.timeout));
    }
    pause(id, spec.poll.delay, cancel).await?;

    loop {
        let (object, state) = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled(id)),
            result = refresh() => result?,
        };
        polls += 1;
        debug!(id, %state, polls, "refreshed");

        if spec.target.contains(&state) {
            info!(
                id,
                %state,
                elapsed_secs = started.elapsed().as_secs(),
                "reached target state"
            );
            return Ok(object);
        }
        if spec.failure.contains(&state) {
            return Err(CoreError::TerminalState {
                id: id.to_owned(),
                state: state.to_string(),
            });
        }
        if !spec.pending.contains(&state) && spec.unexpected == UnexpectedState::Fail {
            return Err(CoreError::UnexpectedState {
                id: id.to_owned(),
                state: state.to_string(),
            });
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || remaining < spec.poll.min_interval {
            return Err(timed_out(id, &state, spec.timeout));
        }
        pause(id, spec.poll.min_interval, cancel).await?;
    }
}

async fn pause(id: &str, duration: Duration, cancel: &CancellationToken) -> Result<(), CoreError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(cancelled(id)),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}

fn timed_out(id: &str, last_state: &dyn fmt::Display, timeout: Duration) -> CoreError {
    info!(id, %last_state, "wait timed out");
    CoreError::Timeout {
        id: id.to_owned(),
        last_state: last_state.to_string(),
        timeout,
    }
}

fn cancelled(id: &str) -> CoreError {
    info!(id, "wait cancelled");
    CoreError::Cancelled { id: id.to_owned() }
}
