//! Publisher against a mock profile API.

use std::time::Duration;

use httpmock::prelude::*;
use patfolio_profile::{PatentPayload, ProfileClient, ProfileCredentials, ProfileError, Publisher};
use patfolio_recon::PatentRecord;

fn payload(id: &str, title: &str) -> PatentPayload {
    PatentPayload::from_record(&PatentRecord::new(id, title))
}

fn client(server: &MockServer) -> ProfileClient {
    ProfileClient::new(&server.url("/v2"), &ProfileCredentials::new("tok")).unwrap()
}

fn mock_profile(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/v2/people/~");
        then.status(200).json_body(serde_json::json!({ "id": "me" }));
    });
}

#[test]
fn test_existing_number_gets_no_creation_call() {
    let server = MockServer::start();
    mock_profile(&server);
    server.mock(|when, then| {
        when.method(GET).path("/v2/people/me/patents");
        then.status(200).json_body(serde_json::json!({
            "elements": [{ "number": "US10157142", "title": "Old title" }]
        }));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/v2/people/me/patents");
        then.status(201);
    });

    let c = client(&server);
    let report = Publisher::new(&c)
        .delay(Duration::ZERO)
        .publish(&[payload("US10157142", "Offloading cache flush")])
        .unwrap();

    create.assert_hits(0);
    assert_eq!(report.skipped, vec!["10157142"]);
    assert!(report.created.is_empty());
}

#[test]
fn test_title_duplicate_skipped_and_rest_created() {
    let server = MockServer::start();
    mock_profile(&server);
    let list = server.mock(|when, then| {
        when.method(GET).path("/v2/people/me/patents");
        then.status(200).json_body(serde_json::json!({
            "elements": [{ "number": "1", "title": "Offloading  CACHE flush" }]
        }));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/v2/people/me/patents");
        then.status(201);
    });

    let c = client(&server);
    let report = Publisher::new(&c)
        .delay(Duration::ZERO)
        .publish(&[
            payload("US10157142", "Offloading cache flush"),
            payload("US10157143", "Interrupt remapping"),
            payload("US10157144", "Machine check recovery"),
        ])
        .unwrap();

    list.assert_hits(1);
    create.assert_hits(2);
    assert_eq!(report.created, vec!["10157143", "10157144"]);
    assert_eq!(report.skipped, vec!["10157142"]);
    assert_eq!(report.total(), 3);
}

#[test]
fn test_failure_recorded_and_batch_continues() {
    let server = MockServer::start();
    mock_profile(&server);
    server.mock(|when, then| {
        when.method(GET).path("/v2/people/me/patents");
        then.status(200).json_body(serde_json::json!({ "elements": [] }));
    });
    let batch = [payload("1", "A"), payload("2", "B"), payload("3", "C")];
    let bodies: Vec<serde_json::Value> =
        batch.iter().map(|p| serde_json::to_value(p).unwrap()).collect();

    let rejected = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/people/me/patents")
            .json_body(bodies[1].clone());
        then.status(500).json_body(serde_json::json!({ "message": "internal" }));
    });
    let accepted: Vec<_> = [&bodies[0], &bodies[2]]
        .into_iter()
        .map(|body| {
            server.mock(|when, then| {
                when.method(POST)
                    .path("/v2/people/me/patents")
                    .json_body(body.clone());
                then.status(201);
            })
        })
        .collect();

    let c = client(&server);
    let report = Publisher::new(&c)
        .delay(Duration::ZERO)
        .publish(&batch)
        .unwrap();

    rejected.assert_hits(1);
    for mock in &accepted {
        mock.assert_hits(1);
    }
    assert!(report.has_failures());
    assert_eq!(report.created, vec!["1", "3"]);
    match &report.failed[0] {
        ProfileError::UploadRejected { number, reason } => {
            assert_eq!(number, "2");
            assert!(reason.contains("500"));
        }
        other => panic!("expected UploadRejected, got {other:?}"),
    }
}

#[test]
fn test_no_skip_duplicates_does_not_list() {
    let server = MockServer::start();
    mock_profile(&server);
    let list = server.mock(|when, then| {
        when.method(GET).path("/v2/people/me/patents");
        then.status(200).json_body(serde_json::json!({ "elements": [{ "number": "1" }] }));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/v2/people/me/patents");
        then.status(201);
    });

    let c = client(&server);
    let report = Publisher::new(&c)
        .delay(Duration::ZERO)
        .skip_duplicates(false)
        .publish(&[payload("1", "A")])
        .unwrap();

    list.assert_hits(0);
    create.assert_hits(1);
    assert_eq!(report.created.len(), 1);
}

#[test]
fn test_invalid_batch_makes_no_calls() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.path_includes("/v2/");
        then.status(200).json_body(serde_json::json!({ "id": "me" }));
    });

    let c = client(&server);
    let err = Publisher::new(&c)
        .publish(&[payload("1", "A"), payload("2", "  ")])
        .unwrap_err();

    assert!(matches!(err, ProfileError::Validation(_)));
    any.assert_hits(0);
}

#[test]
fn test_unauthenticated_aborts_before_uploads() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/people/~");
        then.status(401);
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/v2/people/me/patents");
        then.status(201);
    });

    let c = client(&server);
    let err = Publisher::new(&c).publish(&[payload("1", "A")]).unwrap_err();
    assert!(matches!(err, ProfileError::NotAuthenticated));
    create.assert_hits(0);
}
