//! Request executor, retry and error classification against a mock server.

mod common;

use moderately_client::{
    CreateDatasetRequest, ErrorKind, ListPipelineExecutionsQuery, RequestDescriptor, RetryPolicy,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{builder_for, client_for, page_json, API_KEY, TEAM_ID};

async fn received(server: &MockServer) -> Vec<wiremock::Request> {
    server.received_requests().await.unwrap_or_default()
}

#[tokio::test]
async fn test_transient_statuses_retry_until_budget() {
    for status in [502u16, 503, 504, 429] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/f-1"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .files()
            .retrieve("f-1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(status));
        assert_eq!(received(&server).await.len(), 3, "status {}", status);
    }
}

#[tokio::test]
async fn test_client_errors_fail_immediately() {
    for status in [400u16, 401, 403, 404, 409, 422] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/f-1"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": "no"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .files()
            .retrieve("f-1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(status));
        assert_eq!(received(&server).await.len(), 1, "status {}", status);
    }
}

#[tokio::test]
async fn test_retry_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/d-1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/datasets/d-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"datasetId": "d-1", "name": "Sales"})),
        )
        .mount(&server)
        .await;

    let dataset = client_for(&server).datasets().retrieve("d-1").await.unwrap();
    assert_eq!(dataset.name, "Sales");
    assert_eq!(received(&server).await.len(), 3);
}

#[tokio::test]
async fn test_disabled_retry_makes_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = builder_for(&server)
        .retry_policy(RetryPolicy::disabled())
        .build()
        .unwrap();
    let err = client.pipelines().retrieve("p-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(received(&server).await.len(), 1);
}

#[tokio::test]
async fn test_every_request_is_authenticated() {
    let server = MockServer::start().await;
    Mock::given(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(json!([]))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.files().list(Default::default()).await.unwrap();
    client.users().list(Default::default()).await.unwrap();
    client.agents().list(Default::default()).await.unwrap();

    let requests = received(&server).await;
    assert_eq!(requests.len(), 3);
    for request in requests {
        assert!(request.headers.get("user-agent").is_some());
    }
}

#[tokio::test]
async fn test_list_calls_carry_team_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("teamIds", TEAM_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(json!([]))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.files().list(Default::default()).await.unwrap();
    client.datasets().list(Default::default()).await.unwrap();
    client.pipelines().list(Default::default()).await.unwrap();
    client
        .pipeline_executions()
        .list(ListPipelineExecutionsQuery {
            pipeline_ids: vec!["p-1".to_string()],
            page_size: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    let requests = received(&server).await;
    assert_eq!(requests.len(), 4);
    let last = requests.last().unwrap().url.query().unwrap_or_default().to_string();
    assert!(last.contains("pipelineIds=p-1"), "{}", last);
    assert!(last.contains("pageSize=5"), "{}", last);
}

#[tokio::test]
async fn test_explicit_team_filter_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(json!([]))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let _: Value = client
        .execute(RequestDescriptor::list("files").query_pair("teamIds", "other-team"))
        .await
        .unwrap();

    let requests = received(&server).await;
    assert_eq!(requests[0].url.query(), Some("teamIds=other-team"));
}

#[tokio::test]
async fn test_create_calls_carry_team_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/datasets"))
        .and(body_json(json!({"name": "Sales", "teamId": TEAM_ID})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"datasetId": "d-1", "name": "Sales"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dataset = client_for(&server)
        .datasets()
        .create(CreateDatasetRequest {
            name: "Sales".to_string(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(dataset.dataset_id, "d-1");
}

#[tokio::test]
async fn test_validation_error_exposes_fields() {
    let body = json!({
        "message": "Validation failed",
        "errors": [
            {"field": "name", "message": "is required"},
            {"field": "description", "message": "too long"}
        ]
    });
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .pipelines()
        .create(moderately_client::CreatePipelineRequest {
            name: String::new(),
            description: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.body_json(), Some(body));
    let fields: Vec<(&str, &str)> = err
        .field_errors()
        .iter()
        .map(|f| (f.field.as_str(), f.message.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![("name", "is required"), ("description", "too long")]
    );
    assert_eq!(received(&server).await.len(), 1);
}

#[tokio::test]
async fn test_error_message_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"detail": "already exists"})))
        .mount(&server)
        .await;

    let err = client_for(&server).agents().retrieve("a-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/files/f-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).files().delete("f-1").await.unwrap();
}

#[tokio::test]
async fn test_unparsable_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).teams().retrieve("t-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(received(&server).await.len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = moderately_client::ModeratelyClient::builder()
        .api_key(API_KEY)
        .team_id(TEAM_ID)
        .base_url("http://127.0.0.1:9")
        .retry_policy(RetryPolicy::disabled())
        .build()
        .unwrap();

    let err = client.files().retrieve("f-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
}
