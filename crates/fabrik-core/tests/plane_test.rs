// `ControlPlane for FabricClient` against a wiremock server: error
// classification per call. Inherent client methods share the trait's
// names, so calls go through the trait path.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fabrik_api::{ApiFamily, Credentials, FabricClient, PatchOperation, TransportConfig};
use fabrik_core::{
    AttributeBag, CloudRouter, Connection, ControlPlane, ErrorClass, LifecycleConfig,
    LocalResource, Orchestrator, ResourceDescriptor, ResourceKind,
};

async fn setup() -> (MockServer, FabricClient) {
    let server = MockServer::start().await;
    let creds = Credentials::for_family(ApiFamily::Fabric, SecretString::from("t0ken"));
    let client = FabricClient::new(&server.uri(), &creds, &TransportConfig::default()).unwrap();
    (server, client)
}

async fn mount_error(server: &MockServer, verb: &str, route: &str, status: u16, code: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!([
            { "errorCode": code, "errorMessage": "rejected" }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_delete_conflict_code_is_already_deleted() {
    let (server, client) = setup().await;
    mount_error(&server, "DELETE", "/fabric/v4/connections/conn-1", 400, "EQ-3142509").await;

    let desc = ResourceDescriptor::new(ResourceKind::Connection, "conn-1");
    let err = ControlPlane::delete::<Connection>(&client, &desc).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::AlreadyDeletedConflict);
}

#[tokio::test]
async fn test_get_not_found_ignores_delete_codes() {
    let (server, client) = setup().await;
    mount_error(&server, "GET", "/fabric/v4/connections/conn-1", 404, "EQ-3142509").await;

    let desc = ResourceDescriptor::new(ResourceKind::Connection, "conn-1");
    let err = ControlPlane::get::<Connection>(&client, &desc).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_patch_rejection_is_not_a_delete_conflict() {
    let (server, client) = setup().await;
    mount_error(&server, "PATCH", "/fabric/v4/routers/cr-1", 400, "EQ-3040055").await;

    let desc = ResourceDescriptor::new(ResourceKind::CloudRouter, "cr-1");
    let ops = [PatchOperation::replace("/name", "renamed")];
    let err = ControlPlane::patch::<CloudRouter>(&client, &desc, &ops).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[tokio::test]
async fn test_read_of_deleted_connection_clears_identifier() {
    let (server, client) = setup().await;
    mount_error(&server, "GET", "/fabric/v4/connections/conn-1", 404, "EQ-3142509").await;

    let orch = Orchestrator::new(client, LifecycleConfig::default());
    let mut local = LocalResource::new(AttributeBag::new()).with_id("conn-1");

    let err = orch.read::<Connection>(&mut local).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(local.id, None);
}
