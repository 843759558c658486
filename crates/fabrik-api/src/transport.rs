// Shared transport configuration for building reqwest::Client instances.
//
// Fabric and Metal clients share TLS and timeout settings through this
// module; credentials arrive as default headers.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (test endpoints only).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request timeout. Reconciliation deadlines are separate.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("fabrik/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TlsMode {
    /// Install this verification mode on `builder`.
    fn apply(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder, Error> {
        Ok(match self {
            Self::System => builder,
            Self::CustomCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("cannot read CA bundle {}: {e}", path.display()))
                })?;
                let ca = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    Error::Tls(format!("{} is not a PEM certificate: {e}", path.display()))
                })?;
                builder.add_root_certificate(ca)
            }
            Self::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        })
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` sending `headers` on every request.
    ///
    /// Used by [`FabricClient`](crate::FabricClient) to inject the
    /// credential header.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers);

        self.tls
            .apply(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_bundle_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/fabrik-ca.pem")),
            ..TransportConfig::default()
        };
        let err = config.build_client_with_headers(HeaderMap::new()).unwrap_err();
        assert!(matches!(err, Error::Tls(ref msg) if msg.contains("fabrik-ca.pem")));
    }

    #[test]
    fn insecure_mode_builds() {
        let config = TransportConfig {
            tls: TlsMode::DangerAcceptInvalid,
            ..TransportConfig::default()
        };
        assert!(config.build_client_with_headers(HeaderMap::new()).is_ok());
    }
}
