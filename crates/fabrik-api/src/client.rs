// Async HTTP client for the Equinix control-plane APIs.
//
// Base path: the API root (e.g. https://api.equinix.com/); resource
// paths carry their own family prefix (`fabric/v4/...`, `metal/v1/...`).
// Auth: Bearer token (Fabric) or X-Auth-Token (Metal) default header.

use reqwest::StatusCode;
use reqwest::header::{ETAG, IF_MATCH};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::types::{ChangeResponse, ErrorBody, Page, PatchOperation, Tagged};
use crate::{Credentials, Error, TransportConfig};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one control-plane endpoint.
///
/// Generic over payload types: every resource kind goes through the same
/// seven calls (create, get, replace, patch, delete, search, get_change).
#[derive(Debug, Clone)]
pub struct FabricClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FabricClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from credentials and a transport config.
    ///
    /// The credential header is injected as a default header on every
    /// request.
    pub fn new(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(credentials.headers()?)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"fabric/v4/routers"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Tagged<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let etag = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let value = self.handle_response(resp).await?;
        Ok(Tagged { value, etag })
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        etag: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url} if_match={etag:?}");

        let mut req = self.http.put(url).json(body);
        if let Some(tag) = etag {
            req = req.header(IF_MATCH, tag);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Success with any (or no) body; deletes answer with the deleted
    /// object on some kinds and nothing on others.
    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        if status == StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&raw) {
            Ok(body) => {
                let errors = body.into_entries();
                let message = errors
                    .iter()
                    .find_map(|e| e.error_message.clone())
                    .unwrap_or_else(|| status.to_string());
                Error::Api {
                    status: status.as_u16(),
                    message,
                    errors,
                }
            }
            Err(_) => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                errors: Vec::new(),
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `POST {collection}`: submit a create request.
    pub async fn create<B, T>(&self, collection: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.post_json(collection, body).await
    }

    /// `GET {item}`: fetch one object together with its `ETag`.
    pub async fn get<T: DeserializeOwned>(&self, item: &str) -> Result<Tagged<T>, Error> {
        self.get_json(item).await
    }

    /// `PUT {item}`: full-document replacement, optionally guarded by
    /// `If-Match`.
    pub async fn replace<B, T>(&self, item: &str, body: &B, etag: Option<&str>) -> Result<T, Error>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.put_json(item, body, etag).await
    }

    /// `PATCH {item}`: field-level operations.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        item: &str,
        ops: &[PatchOperation],
    ) -> Result<T, Error> {
        self.patch_json(item, &ops).await
    }

    /// `DELETE {item}`.
    pub async fn delete(&self, item: &str) -> Result<(), Error> {
        self.delete_empty(item).await
    }

    /// `POST {collection}/search`: one page of results.
    pub async fn search<B, T>(&self, collection: &str, query: &B) -> Result<Page<T>, Error>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let path = format!("{}/search", collection.trim_end_matches('/'));
        self.post_json(&path, query).await
    }

    /// `GET {item}/changes/{change_id}`: status of an asynchronous change.
    pub async fn get_change(&self, item: &str, change_id: &str) -> Result<ChangeResponse, Error> {
        let path = format!("{}/changes/{change_id}", item.trim_end_matches('/'));
        Ok(self.get_json(&path).await?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client =
            FabricClient::from_reqwest("https://api.example.com/v", reqwest::Client::new())
                .unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v/");
        assert_eq!(
            client.url("/fabric/v4/routers").unwrap().as_str(),
            "https://api.example.com/v/fabric/v4/routers"
        );
    }

    #[test]
    fn rejects_garbage_base_url() {
        let result = FabricClient::from_reqwest("not a url", reqwest::Client::new());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
