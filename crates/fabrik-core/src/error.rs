// ── Core error types ──
//
// Errors surfaced by the lifecycle engine. Remote failures arrive already
// classified (see `ErrorClass`); everything downstream branches on the
// class, never on HTTP status codes or error strings.

use std::time::Duration;

use thiserror::Error;

pub use fabrik_api::ErrorClass;

/// Input that can never succeed as given.
///
/// Raised by the mapper, the search query builder and the orchestrator's
/// own preconditions. Each limit violation is its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "too many OR group filters passed. Passed {passed} but can only have a maximum of {max}"
    )]
    TooManyOrFilters { passed: usize, max: usize },

    #[error(
        "too many filters are applied. The maximum is {max} and {provided} were provided. \
         Please reduce your filter count to {max}"
    )]
    TooManyFilters { provided: usize, max: usize },

    #[error("no filters passed to the search query builder")]
    NoFilters,

    #[error("pagination {field} {value} is out of bounds ({bounds})")]
    PaginationOutOfBounds {
        field: &'static str,
        value: i64,
        bounds: &'static str,
    },

    #[error("attribute `{key}` expected {expected}, found {found}")]
    AttributeType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute `{key}` has invalid value `{value}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("attribute `{key}` is required")]
    MissingAttribute { key: String },

    #[error("{kind} has no identifier; it was never created or has been removed")]
    MissingIdentifier { kind: String },

    #[error("{operation} is not supported for {kind}")]
    Unsupported { kind: String, operation: &'static str },

    #[error("wait states overlap: {state} is both pending and target")]
    OverlappingStates { state: String },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote failures (classified at the call boundary) ────────────
    #[error("{class} error: {message}")]
    Remote {
        class: ErrorClass,
        message: String,
        /// First control-plane error code (e.g. "EQ-3142509").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local validation ─────────────────────────────────────────────
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    // ── Reconciliation ───────────────────────────────────────────────
    #[error(
        "timed out after {}s waiting for {id} (last state: {last_state})",
        .timeout.as_secs()
    )]
    Timeout {
        id: String,
        last_state: String,
        /// The budget this wait was given.
        timeout: Duration,
    },

    #[error("{id} reached terminal state {state}")]
    TerminalState { id: String, state: String },

    #[error("{id} reached unexpected state {state}")]
    UnexpectedState { id: String, state: String },

    #[error("wait for {id} was cancelled")]
    Cancelled { id: String },

    // ── Operation outcomes ───────────────────────────────────────────
    #[error(
        "no records are found for the {kind} search criteria provided, please change the search criteria"
    )]
    NoRecords { kind: String },

    #[error("nothing to update for {id}")]
    NothingToUpdate { id: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Classify a client error, treating `idempotent_codes` as
    /// already-deleted conflicts.
    pub fn from_api(err: &fabrik_api::Error, idempotent_codes: &[&str]) -> Self {
        Self::Remote {
            class: err.classify(idempotent_codes),
            message: err.to_string(),
            code: err.api_error_code().map(str::to_owned),
            status: err.status(),
        }
    }

    /// Classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Remote { class, .. } => *class,
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::Cancelled { .. } | Self::Internal(_) => ErrorClass::Transient,
            Self::Validation(_)
            | Self::TerminalState { .. }
            | Self::UnexpectedState { .. }
            | Self::NoRecords { .. }
            | Self::NothingToUpdate { .. } => ErrorClass::Validation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    pub fn is_already_deleted(&self) -> bool {
        self.class() == ErrorClass::AlreadyDeletedConflict
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fabrik_api::Error> for CoreError {
    fn from(err: fabrik_api::Error) -> Self {
        Self::from_api(&err, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_messages_name_the_limits() {
        let or = ValidationError::TooManyOrFilters { passed: 4, max: 3 };
        assert_eq!(
            or.to_string(),
            "too many OR group filters passed. Passed 4 but can only have a maximum of 3"
        );
        let all = ValidationError::TooManyFilters {
            provided: 9,
            max: 8,
        };
        assert!(all.to_string().contains("The maximum is 8 and 9 were provided"));
    }

    #[test]
    fn timeout_carries_class() {
        let err = CoreError::Timeout {
            id: "r-1".into(),
            last_state: "PROVISIONING".into(),
            timeout: Duration::from_secs(90),
        };
        assert_eq!(err.class(), ErrorClass::Timeout);
        assert_eq!(
            err.to_string(),
            "timed out after 90s waiting for r-1 (last state: PROVISIONING)"
        );
    }
}
