//! Integration tests for record deletion.
//!
//! Mirrors the delete capabilities of the client: script triggers in both
//! shapes, local validation of the record id, server-side rejections, and
//! expired-token invalidation.

use std::time::Duration;

use fmdata::{DataClient, FmConfig, FmError, RequestOptions, ScriptPhase, ScriptTrigger};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(server: &MockServer) -> DataClient {
    DataClient::new(
        FmConfig::builder()
            .server(server.uri())
            .database("Heroes")
            .user("admin")
            .password("secret")
            .allow_insecure_http()
            .build()
            .unwrap(),
    )
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/fmi/data/v1/databases/Heroes/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"token": "test-token"},
            "messages": [{"code": "0", "message": "OK"}]
        })))
        .mount(server)
        .await;
}

fn ok_empty() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "response": {},
        "messages": [{"code": "0", "message": "OK"}]
    }))
}

#[tokio::test]
async fn test_delete_removes_record() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    client.delete("Heroes", "742", None).await.unwrap();
}

#[tokio::test]
async fn test_delete_triggers_scripts_via_array() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .and(query_param("script.prerequest", "Error Script"))
        .and(query_param("script.prerequest.param", "A Parameter"))
        .and(query_param("script", "Error Script"))
        .and(query_param("script.presort", "Error Script"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let options = RequestOptions::new().scripts(vec![
        ScriptTrigger::new("Error Script", ScriptPhase::Prerequest, Some(json!("A Parameter"))),
        ScriptTrigger::new("Error Script", ScriptPhase::Default, Some(json!("A Parameter"))),
        ScriptTrigger::new("Error Script", ScriptPhase::Presort, Some(json!("A Parameter"))),
    ]);
    client.delete("Heroes", "742", Some(options)).await.unwrap();
}

#[tokio::test]
async fn test_delete_triggers_scripts_via_scalar_parameters() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .and(query_param("script.prerequest", "Error Script"))
        .and(query_param("script.prerequest.param", "A Parameter"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let options =
        RequestOptions::new().script_prerequest("Error Script", Some(json!("A Parameter")));
    client.delete("Heroes", "742", Some(options)).await.unwrap();
}

#[tokio::test]
async fn test_delete_mixes_scalar_parameters_and_script_array() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .and(query_param("script.prerequest", "Prep Script"))
        .and(query_param("script", "Error Script"))
        .and(query_param("script.presort", "Error Script"))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let options = RequestOptions::new()
        .script_prerequest("Prep Script", Some(json!("A Parameter")))
        .scripts(vec![
            ScriptTrigger::new("Error Script", ScriptPhase::Default, Some(json!("A Parameter"))),
            ScriptTrigger::new("Error Script", ScriptPhase::Presort, Some(json!("A Parameter"))),
        ]);
    client.delete("Heroes", "742", Some(options)).await.unwrap();
}

#[tokio::test]
async fn test_delete_stringifies_script_parameters() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .and(query_param("script.prerequest.param", "2"))
        .and(query_param("script.presort.param", r#"{"data":true}"#))
        .respond_with(ok_empty())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let options = RequestOptions::new()
        .script_prerequest("Error Script", Some(json!(2)))
        .scripts(vec![ScriptTrigger::new(
            "Error Script",
            ScriptPhase::Presort,
            Some(json!({"data": true})),
        )]);
    client.delete("Heroes", "742", Some(options)).await.unwrap();
}

#[tokio::test]
async fn test_delete_without_record_id_fails_before_any_network_call() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    let error = client.delete("Heroes", "", None).await.unwrap_err();

    assert!(matches!(error, FmError::Validation { .. }));
    let normalized = serde_json::to_value(error.normalized()).unwrap();
    let keys: Vec<&str> = normalized
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"code") && keys.contains(&"message"));

    // No authentication, no delete: the failure is purely local.
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_with_server_rejected_record_id_surfaces_server_error() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/-2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "response": {},
            "messages": [{"code": "101", "message": "Record is missing"}]
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let error = client.delete("Heroes", "-2", None).await.unwrap_err();

    // The id was sent verbatim; the verdict is the server's, not a local
    // validation error.
    assert!(matches!(error, FmError::Api { .. }));
    assert_eq!(error.code(), "101");
    assert_eq!(error.message(), "Record is missing");
}

#[tokio::test]
async fn test_delete_with_expired_token_clears_session_before_surfacing() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "response": {},
            "messages": [{"code": "952", "message": "Invalid FileMaker Data API token (*)"}]
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let error = client.delete("Heroes", "742", None).await.unwrap_err();

    // The error reports the already-cleared token and session state agrees.
    assert!(error.is_token_expired());
    assert_eq!(error.token(), Some(""));
    assert!(client.token().await.is_none());

    let normalized = serde_json::to_value(error.normalized()).unwrap();
    let object = normalized.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(object["token"], "");
}

#[tokio::test]
async fn test_delete_timeout_resolves_to_structured_error() {
    let mock_server = MockServer::start().await;
    mount_session(&mock_server).await;
    Mock::given(method("DELETE"))
        .and(path("/fmi/data/v1/databases/Heroes/layouts/Heroes/records/742"))
        .respond_with(ok_empty().set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let options = RequestOptions::new().timeout(Duration::from_millis(10));
    let error = client.delete("Heroes", "742", Some(options)).await.unwrap_err();

    assert!(matches!(error, FmError::Connection { .. }));
    assert_eq!(error.code(), fmdata::clients::TIMEOUT_ERROR_CODE);
    assert!(!error.message().is_empty());
}
