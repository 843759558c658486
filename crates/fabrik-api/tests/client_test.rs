// Integration tests for `FabricClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fabrik_api::{
    ApiFamily, Credentials, Error, ErrorClass, FabricClient, Page, PatchOperation, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FabricClient) {
    let server = MockServer::start().await;
    let client = FabricClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

const ROUTERS: &str = "fabric/v4/routers";

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_create_posts_payload_with_bearer_token() {
    let server = MockServer::start().await;
    let creds = Credentials::for_family(ApiFamily::Fabric, SecretString::from("s3cret"));
    let client = FabricClient::new(&server.uri(), &creds, &TransportConfig::default()).unwrap();

    let request = json!({ "name": "fcr-1", "type": "XF_ROUTER", "package": { "code": "STANDARD" } });

    Mock::given(method("POST"))
        .and(path("/fabric/v4/routers"))
        .and(header("authorization", "Bearer s3cret"))
        .and(body_json(&request))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": "r-1",
            "name": "fcr-1",
            "state": "PROVISIONING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created: Value = client.create(ROUTERS, &request).await.unwrap();
    assert_eq!(created["uuid"], "r-1");
    assert_eq!(created["state"], "PROVISIONING");
}

#[tokio::test]
async fn test_get_returns_etag() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fabric/v4/serviceProfiles/sp-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"42\"")
                .set_body_json(json!({ "uuid": "sp-1", "state": "ACTIVE" })),
        )
        .mount(&server)
        .await;

    let fetched = client
        .get::<Value>("fabric/v4/serviceProfiles/sp-1")
        .await
        .unwrap();
    assert_eq!(fetched.value["state"], "ACTIVE");
    assert_eq!(fetched.etag.as_deref(), Some("\"42\""));
}

#[tokio::test]
async fn test_replace_sends_if_match() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/fabric/v4/serviceProfiles/sp-1"))
        .and(header("if-match", "\"42\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uuid": "sp-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let body = json!({ "name": "renamed" });
    let updated: Value = client
        .replace("fabric/v4/serviceProfiles/sp-1", &body, Some("\"42\""))
        .await
        .unwrap();
    assert_eq!(updated["uuid"], "sp-1");
}

#[tokio::test]
async fn test_patch_sends_operation_array() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/fabric/v4/routers/r-1"))
        .and(body_json(json!([
            { "op": "replace", "path": "/name", "value": "new-name" }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uuid": "r-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let ops = [PatchOperation::replace("/name", "new-name")];
    let _: Value = client.patch("fabric/v4/routers/r-1", &ops).await.unwrap();
}

#[tokio::test]
async fn test_search_posts_to_search_suffix() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/fabric/v4/routers/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pagination": { "offset": 0, "limit": 20, "total": 2 },
            "data": [ { "uuid": "a" }, { "uuid": "b" } ]
        })))
        .mount(&server)
        .await;

    let page: Page<Value> = client
        .search(ROUTERS, &json!({ "filter": { "and": [] } }))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.unwrap().total, 2);
}

#[tokio::test]
async fn test_get_change() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(
            "/fabric/v4/connections/c-1/routingProtocols/rp-1/changes/ch-9",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "ch-9",
            "type": "ROUTING_PROTOCOL_UPDATE",
            "status": "COMPLETED"
        })))
        .mount(&server)
        .await;

    let change = client
        .get_change("fabric/v4/connections/c-1/routingProtocols/rp-1", "ch-9")
        .await
        .unwrap();
    assert_eq!(change.status.as_deref(), Some("COMPLETED"));
    assert_eq!(change.change_type.as_deref(), Some("ROUTING_PROTOCOL_UPDATE"));
}

#[tokio::test]
async fn test_delete_accepts_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/fabric/v4/connections/c-1"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({ "uuid": "c-1", "state": "DEPROVISIONING" })),
        )
        .mount(&server)
        .await;

    client.delete("fabric/v4/connections/c-1").await.unwrap();
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_error_array_is_parsed_and_classified() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/fabric/v4/connections/c-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            {
                "errorCode": "EQ-3142509",
                "errorMessage": "Connection already deleted",
                "correlationId": "corr-1",
                "additionalInfo": [ { "property": "uuid", "reason": "deleted" } ]
            }
        ])))
        .mount(&server)
        .await;

    let err = client.delete("fabric/v4/connections/c-1").await.unwrap_err();
    match &err {
        Error::Api {
            status,
            message,
            errors,
        } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Connection already deleted");
            assert_eq!(errors[0].additional_info.len(), 1);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert_eq!(
        err.classify(&["EQ-3142509"]),
        ErrorClass::AlreadyDeletedConflict
    );
    assert_eq!(err.classify(&[]), ErrorClass::Validation);
}

#[tokio::test]
async fn test_single_error_object_is_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fabric/v4/routers/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorCode": "EQ-3040021",
            "errorMessage": "Cloud router not found"
        })))
        .mount(&server)
        .await;

    let err = client
        .get::<Value>("fabric/v4/routers/missing")
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected 404, got: {err:?}");
    assert_eq!(err.api_error_code(), Some("EQ-3040021"));
    assert_eq!(err.classify(&[]), ErrorClass::NotFound);
}

#[tokio::test]
async fn test_server_error_with_plain_body_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fabric/v4/routers/r-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let result = client.get::<Value>("fabric/v4/routers/r-1").await;
    assert!(
        matches!(result, Err(Error::Api { status: 502, ref message, .. }) if message == "bad gateway"),
        "expected Api 502, got: {result:?}"
    );
    assert_eq!(result.unwrap_err().classify(&[]), ErrorClass::Transient);
}

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fabric/v4/routers/r-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get::<Value>("fabric/v4/routers/r-1").await;
    assert!(
        matches!(result, Err(Error::InvalidToken)),
        "expected InvalidToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_garbage_success_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fabric/v4/routers/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = client.get::<Value>("fabric/v4/routers/r-1").await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "<html>"),
        "expected Deserialization, got: {result:?}"
    );
}
