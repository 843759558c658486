use thiserror::Error;

use crate::types::ApiErrorEntry;

/// Top-level error type for the `fabrik-api` crate.
///
/// Covers every failure mode of a single control-plane call: credentials,
/// transport, structured API errors and undecodable bodies.
/// `fabrik-core` turns these into classified lifecycle errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The credential could not be turned into a request header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The control plane rejected the bearer token (HTTP 401).
    #[error("Invalid or expired access token")]
    InvalidToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Control plane ───────────────────────────────────────────────
    /// Structured error returned by the control plane.
    ///
    /// `errors` holds every entry of the response body; `message` is the
    /// first entry's text (or the raw body when it was not JSON).
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<ApiErrorEntry>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Coarse outcome class of a failed control-plane call.
///
/// Assigned once where the call returns; lifecycle code branches on the
/// class and never re-inspects status codes or error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    /// Worth retrying later: 5xx, 408, 429, connect/timeout failures.
    Transient,
    /// The object does not exist (HTTP 404).
    NotFound,
    /// Delete raced with an earlier delete or a pending change.
    AlreadyDeletedConflict,
    /// The request itself is wrong; retrying will not help.
    Validation,
    /// A reconciliation deadline passed.
    Timeout,
}

impl Error {
    /// HTTP status code, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::InvalidToken => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Api { status, .. } => matches!(status, 408 | 429 | 500..=599),
            Self::Deserialization { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Every `errorCode` carried by the response body.
    pub fn error_codes(&self) -> impl Iterator<Item = &str> {
        let entries: &[ApiErrorEntry] = match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        };
        entries.iter().filter_map(|e| e.error_code.as_deref())
    }

    /// Returns `true` if any error entry carries `code`.
    pub fn has_error_code(&self, code: &str) -> bool {
        self.error_codes().any(|c| c == code)
    }

    /// First API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        self.error_codes().next()
    }

    /// Classify this failure.
    ///
    /// `idempotent_codes` are the error codes the caller treats as
    /// "already gone" for a delete; they take precedence over the status.
    pub fn classify(&self, idempotent_codes: &[&str]) -> ErrorClass {
        if idempotent_codes.iter().any(|code| self.has_error_code(code)) {
            return ErrorClass::AlreadyDeletedConflict;
        }
        if self.is_not_found() {
            return ErrorClass::NotFound;
        }
        if self.is_transient() {
            return ErrorClass::Transient;
        }
        match self {
            Self::Transport(e) if e.status().is_none() => ErrorClass::Transient,
            _ => ErrorClass::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, codes: &[&str]) -> Error {
        Error::Api {
            status,
            message: "boom".into(),
            errors: codes
                .iter()
                .map(|c| ApiErrorEntry {
                    error_code: Some((*c).to_owned()),
                    ..ApiErrorEntry::default()
                })
                .collect(),
        }
    }

    #[test]
    fn idempotent_code_wins_over_status() {
        let err = api(400, &["EQ-3142509"]);
        assert_eq!(
            err.classify(&["EQ-3142509"]),
            ErrorClass::AlreadyDeletedConflict
        );
        assert_eq!(err.classify(&[]), ErrorClass::Validation);
    }

    #[test]
    fn status_classes() {
        assert_eq!(api(404, &[]).classify(&[]), ErrorClass::NotFound);
        assert_eq!(api(503, &[]).classify(&[]), ErrorClass::Transient);
        assert_eq!(api(429, &[]).classify(&[]), ErrorClass::Transient);
        assert_eq!(api(422, &[]).classify(&[]), ErrorClass::Validation);
        assert_eq!(Error::InvalidToken.classify(&[]), ErrorClass::Validation);
    }

    #[test]
    fn undecodable_body_is_transient() {
        let err = Error::Deserialization {
            message: "eof".into(),
            body: String::new(),
        };
        assert_eq!(err.classify(&[]), ErrorClass::Transient);
    }

    #[test]
    fn codes_are_collected_from_every_entry() {
        let err = api(400, &["EQ-1", "EQ-3040055"]);
        assert!(err.has_error_code("EQ-3040055"));
        assert_eq!(err.api_error_code(), Some("EQ-1"));
    }
}
