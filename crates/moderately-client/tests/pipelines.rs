//! Pipeline configuration and execution workflows.

mod common;

use std::time::Duration;

use moderately_client::{
    CreateConfigurationVersionRequest, CreatePipelineExecutionRequest, ErrorKind, HttpResponse,
    RetryPolicy, WaitOptions,
};
use serde_json::json;
use tokio::time::Instant;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, scripted_client, ScriptedTransport, TEAM_ID};

fn execution(status: &str) -> HttpResponse {
    HttpResponse::new(
        200,
        json!({"pipelineExecutionId": "e-1", "status": status}).to_string(),
    )
}

#[tokio::test]
async fn test_create_configuration_and_execute() {
    let server = MockServer::start().await;
    let configuration = json!({
        "blocks": {"input": {"type": "input"}, "output": {"type": "output"}},
        "connections": [{"source": "input", "target": "output"}]
    });
    Mock::given(method("POST"))
        .and(path("/pipeline-configuration-versions"))
        .and(body_json(json!({
            "pipelineId": "p-1",
            "configuration": configuration,
            "teamId": TEAM_ID,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "pipelineConfigurationVersionId": "cv-1",
            "pipelineId": "p-1",
            "configuration": configuration,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pipeline-executions"))
        .and(body_json(json!({
            "pipelineConfigurationVersionId": "cv-1",
            "pipelineInput": "hello",
            "pipelineInputSummary": "greeting",
            "teamId": TEAM_ID,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "pipelineExecutionId": "e-1",
            "pipelineConfigurationVersionId": "cv-1",
            "status": "pending",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let version = client
        .pipeline_configuration_versions()
        .create(CreateConfigurationVersionRequest {
            pipeline_id: "p-1".to_string(),
            configuration: configuration.clone(),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(version.block_count(), 2);
    assert_eq!(version.connection_count(), 1);

    let execution = client
        .pipeline_executions()
        .create(CreatePipelineExecutionRequest {
            pipeline_configuration_version_id: version.configuration_version_id,
            pipeline_input: json!("hello"),
            pipeline_input_summary: "greeting".to_string(),
        })
        .await
        .unwrap();
    assert!(execution.is_pending());
}

#[tokio::test]
async fn test_validate_and_clone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pipeline-configuration-versions/validate"))
        .and(body_json(json!({"configuration": {"blocks": {}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "errors": ["no output block"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pipeline-configuration-versions/cv-1/clone"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "pipelineConfigurationVersionId": "cv-2",
            "status": "draft"
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).pipeline_configuration_versions();
    let report = api.validate(&json!({"blocks": {}})).await.unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.warnings.is_empty());

    let copy = api.clone_version("cv-1").await.unwrap();
    assert_eq!(copy.configuration_version_id, "cv-2");
    assert_eq!(copy.status.as_deref(), Some("draft"));
}

#[tokio::test]
async fn test_output_inline_and_external() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pipeline-executions/e-1/output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 42})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pipeline-executions/e-2/output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputUrl": format!("{}/storage/e-2.json", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/e-2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": [1, 2, 3]})))
        .mount(&server)
        .await;

    let api = client_for(&server).pipeline_executions();
    assert_eq!(api.output("e-1").await.unwrap(), json!({"result": 42}));
    assert_eq!(api.output("e-2").await.unwrap(), json!({"rows": [1, 2, 3]}));
}

#[tokio::test(start_paused = true)]
async fn test_wait_polls_until_terminal() {
    let transport = ScriptedTransport::new([
        execution("pending"),
        execution("running"),
        execution("completed"),
    ]);
    let client = scripted_client(&transport, RetryPolicy::disabled());

    let start = Instant::now();
    let done = client
        .pipeline_executions()
        .wait(
            "e-1",
            WaitOptions {
                timeout: Duration::from_secs(60),
                poll_interval: Duration::from_secs(2),
            },
        )
        .await
        .unwrap();

    assert!(done.is_completed());
    assert_eq!(transport.call_count(), 3);
    assert!(start.elapsed() >= Duration::from_secs(4));
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.url.path() == "/pipeline-executions/e-1"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_returns_failed_execution() {
    let transport = ScriptedTransport::new([execution("failed")]);
    let client = scripted_client(&transport, RetryPolicy::disabled());

    let done = client
        .pipeline_executions()
        .wait("e-1", WaitOptions::default())
        .await
        .unwrap();
    assert!(done.is_failed());
    assert!(done.is_terminal());
}

#[tokio::test(start_paused = true)]
async fn test_wait_times_out() {
    let transport = ScriptedTransport::new((0..10).map(|_| execution("running")));
    let client = scripted_client(&transport, RetryPolicy::disabled());

    let err = client
        .pipeline_executions()
        .wait(
            "e-1",
            WaitOptions {
                timeout: Duration::from_secs(5),
                poll_interval: Duration::from_secs(2),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WaitTimeout);
    assert!(err.to_string().contains("e-1"));
    // Polls at 0s, 2s, 4s and the clamped 5s deadline
    assert_eq!(transport.call_count(), 4);
}
