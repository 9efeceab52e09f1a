//! Wire-level tests for the bulk patch orchestrator against a mock
//! identity endpoint.

use serde_json::json;
use wiremock::matchers::{basic_auth, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use recred_client::{
    AdminCredentials, BulkPatchOrchestrator, ClientError, Connection, PasswordAssignment,
    UserRecord,
};

const BULK_PATH: &str = "/hcmRestApi/scim/Bulk";

fn orchestrator(server: &MockServer) -> BulkPatchOrchestrator {
    let connection = Connection::with_http_client(
        server.uri(),
        AdminCredentials::new("admin", "s3cret"),
        reqwest::Client::new(),
    );
    BulkPatchOrchestrator::new(connection)
}

fn records(names: &[&str]) -> Vec<UserRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| UserRecord {
            username: (*name).to_string(),
            guid: format!("G{i}"),
        })
        .collect()
}

#[tokio::test]
async fn submits_one_batch_with_per_user_operations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .and(basic_auth("admin", "s3cret"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "Operations": [
                { "method": "PATCH", "path": "/Users/G0", "bulkId": "a@x.com" },
                { "method": "PATCH", "path": "/Users/G1", "bulkId": "b@x.com" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Operations": [
                { "bulkId": "a@x.com", "status": { "code": "200" } },
                { "bulkId": "b@x.com", "status": { "code": "200" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = orchestrator(&server)
        .submit(
            &records(&["a@x.com", "b@x.com"]),
            &PasswordAssignment::from_operator_input(None, 12),
        )
        .await
        .unwrap();

    assert_eq!(report.status_code, 200);
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes.iter().all(|o| o.succeeded()));
}

/// A mixed response is the expected partial-failure mode: the batch itself
/// succeeded, individual rows carry their own status.
#[tokio::test]
async fn per_operation_failure_does_not_become_a_batch_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Operations": [
                { "bulkId": "a@x.com", "status": { "code": "200" } },
                { "bulkId": "b@x.com", "status": { "code": "400" } }
            ]
        })))
        .mount(&server)
        .await;

    let report = orchestrator(&server)
        .submit(
            &records(&["a@x.com", "b@x.com"]),
            &PasswordAssignment::from_operator_input(None, 12),
        )
        .await
        .unwrap();

    let ok = &report.outcomes[0];
    let failed = &report.outcomes[1];

    assert!(ok.succeeded());
    assert!(ok.secret.is_some());
    assert!(!failed.succeeded());
    assert_eq!(failed.status_code, 400);
    assert!(failed.secret.is_none());
}

#[tokio::test]
async fn common_assignment_reports_the_same_secret_for_every_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Operations": [
                { "bulkId": "a@x.com", "status": { "code": "200" } },
                { "bulkId": "b@x.com", "status": { "code": "200" } }
            ]
        })))
        .mount(&server)
        .await;

    let report = orchestrator(&server)
        .submit(
            &records(&["a@x.com", "b@x.com"]),
            &PasswordAssignment::from_operator_input(Some("Sh4red!pw"), 12),
        )
        .await
        .unwrap();

    for outcome in &report.outcomes {
        assert_eq!(outcome.secret.as_deref(), Some("Sh4red!pw"));
    }
}

#[tokio::test]
async fn per_user_assignment_reports_distinct_secrets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Operations": [
                { "bulkId": "a@x.com", "status": { "code": "200" } },
                { "bulkId": "b@x.com", "status": { "code": "200" } }
            ]
        })))
        .mount(&server)
        .await;

    let report = orchestrator(&server)
        .submit(
            &records(&["a@x.com", "b@x.com"]),
            &PasswordAssignment::from_operator_input(None, 12),
        )
        .await
        .unwrap();

    let first = report.outcomes[0].secret.as_deref().unwrap();
    let second = report.outcomes[1].secret.as_deref().unwrap();
    assert_ne!(first, second);
    assert_eq!(first.chars().count(), 12);
    assert_eq!(second.chars().count(), 12);
}

#[tokio::test]
async fn batch_level_401_is_classified_as_authentication_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = orchestrator(&server)
        .submit(
            &records(&["a@x.com"]),
            &PasswordAssignment::from_operator_input(None, 12),
        )
        .await
        .unwrap_err();

    match err {
        ClientError::Batch { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("authentication"));
        }
        other => panic!("expected batch error, got {other:?}"),
    }
}

#[tokio::test]
async fn batch_level_500_is_classified_as_remote_fault() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = orchestrator(&server)
        .submit(
            &records(&["a@x.com"]),
            &PasswordAssignment::from_operator_input(None, 12),
        )
        .await
        .unwrap_err();

    match err {
        ClientError::Batch { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("internal fault"));
        }
        other => panic!("expected batch error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_201_counts_as_batch_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "Operations": [
                { "bulkId": "a@x.com", "status": { "code": 201 } }
            ]
        })))
        .mount(&server)
        .await;

    let report = orchestrator(&server)
        .submit(
            &records(&["a@x.com"]),
            &PasswordAssignment::from_operator_input(None, 12),
        )
        .await
        .unwrap();

    assert_eq!(report.status_code, 201);
    assert!(report.outcomes[0].succeeded());
}
