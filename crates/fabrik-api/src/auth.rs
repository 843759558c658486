use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::Error;

/// Which API family a client talks to.
///
/// Marker enum (no data) -- the secret itself lives in [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// Fabric v4 (`Authorization: Bearer`).
    Fabric,
    /// Metal v1 (`X-Auth-Token`).
    Metal,
}

/// Credentials for authenticating with the control plane.
///
/// Token acquisition happens elsewhere; this only carries the result.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// OAuth access token sent as `Authorization: Bearer <token>`.
    Bearer(SecretString),
    /// Static API token sent as `X-Auth-Token: <token>`.
    AuthToken(SecretString),
}

impl Credentials {
    /// Credential style expected by the given API family.
    pub fn for_family(family: ApiFamily, token: SecretString) -> Self {
        match family {
            ApiFamily::Fabric => Self::Bearer(token),
            ApiFamily::Metal => Self::AuthToken(token),
        }
    }

    /// Default headers carrying this credential, marked sensitive.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let (name, raw) = match self {
            Self::Bearer(token) => (AUTHORIZATION, format!("Bearer {}", token.expose_secret())),
            Self::AuthToken(token) => (
                HeaderName::from_static("x-auth-token"),
                token.expose_secret().to_owned(),
            ),
        };

        let mut value = HeaderValue::from_str(&raw).map_err(|e| Error::Authentication {
            message: format!("invalid token header value: {e}"),
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(name, value);
        Ok(headers)
    }
}
