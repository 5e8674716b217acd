//! Presigned upload and download flows.

mod common;

use moderately_client::upload::sha256_hex;
use moderately_client::{ErrorKind, UploadFile};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, page_json, TEAM_ID};

const CONTENTS: &[u8] = b"id,amount\n1,10\n2,20\n";

/// Mounts the three upload endpoints; the presigned URL points back at the
/// same server under `/storage`.
async fn mount_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/files/upload-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "f-123",
            "uploadUrl": format!("{}/storage/f-123?sig=abc", server.uri()),
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/storage/f-123"))
        .and(query_param("sig", "abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/f-123/complete"))
        .and(body_json(json!({
            "fileHash": sha256_hex(CONTENTS),
            "fileSize": CONTENTS.len(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "f-123",
            "name": "sales.csv",
            "status": "completed",
            "mimeType": "text/csv",
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_issues_three_calls_in_order() {
    let server = MockServer::start().await;
    mount_upload(&server).await;

    let file = client_for(&server)
        .files()
        .upload(UploadFile::new("sales.csv", CONTENTS))
        .await
        .unwrap();
    assert_eq!(file.file_id, "f-123");
    assert!(file.is_ready());
    assert!(file.is_csv());

    let requests = server.received_requests().await.unwrap();
    let calls: Vec<(String, String)> = requests
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("POST".to_string(), "/files/upload-url".to_string()),
            ("PUT".to_string(), "/storage/f-123".to_string()),
            ("POST".to_string(), "/files/f-123/complete".to_string()),
        ]
    );

    let slot_request: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(slot_request["fileName"], "sales.csv");
    assert_eq!(slot_request["fileSize"], CONTENTS.len());
    assert_eq!(slot_request["mimeType"], "text/csv");
    assert_eq!(slot_request["teamId"], TEAM_ID);

    let put = &requests[1];
    assert_eq!(put.body, CONTENTS);
    assert!(put.headers.get("authorization").is_none());
    assert_eq!(put.headers.get("content-type").unwrap(), "text/csv");

    assert!(requests[2].headers.get("authorization").is_some());
}

#[tokio::test]
async fn test_upload_forwards_slot_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/upload-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "f-9",
            "uploadUrl": format!("{}/storage/f-9", server.uri()),
            "headers": {"x-amz-server-side-encryption": "AES256"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/f-9/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fileId": "f-9"})))
        .mount(&server)
        .await;

    client_for(&server)
        .files()
        .upload(UploadFile::new("notes.bin", vec![0u8, 1, 2]))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let put = &requests[1];
    assert_eq!(
        put.headers.get("x-amz-server-side-encryption").unwrap(),
        "AES256"
    );
    assert_eq!(
        put.headers.get("content-type").unwrap(),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn test_failed_put_stops_before_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/upload-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "f-1",
            "uploadUrl": format!("{}/storage/f-1", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/f-1/complete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .files()
        .upload(UploadFile::new("a.txt", "hello"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.body(), Some("SignatureDoesNotMatch"));
}

#[tokio::test]
async fn test_incomplete_slot_is_upload_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/upload-url"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"fileId": "f-1", "uploadUrl": ""})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .files()
        .upload(UploadFile::new("a.txt", "hello"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upload);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_download_follows_presigned_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/f-1/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloadUrl": format!("{}/storage/f-1?sig=xyz", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/f-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CONTENTS))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.csv");
    let written = client_for(&server)
        .files()
        .download_to("f-1", &target)
        .await
        .unwrap();

    assert_eq!(written, CONTENTS.len() as u64);
    assert_eq!(std::fs::read(&target).unwrap(), CONTENTS);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[1].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_dataset_upload_registers_data_version() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/datasets/d-1/data-versions"))
        .and(body_json(json!({
            "fileId": "f-123",
            "fileType": "csv",
            "status": "current",
            "teamId": TEAM_ID,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "datasetDataVersionId": "dv-1",
            "datasetId": "d-1",
            "versionNo": 1,
            "fileType": "csv"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let version = client_for(&server)
        .datasets()
        .upload_data("d-1", UploadFile::new("sales.csv", CONTENTS))
        .await
        .unwrap();
    assert_eq!(version.dataset_data_version_id, "dv-1");
    assert_eq!(version.version_no, Some(1));
}

#[tokio::test]
async fn test_dataset_download_uses_current_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/d-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "datasetId": "d-1",
            "name": "Sales",
            "currentDataVersionId": "dv-7"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/datasets/d-1/data-versions/dv-7/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloadUrl": format!("{}/storage/dv-7", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/dv-7"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(CONTENTS))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .datasets()
        .download_data("d-1", None)
        .await
        .unwrap();
    assert_eq!(&bytes[..], CONTENTS);
}

#[tokio::test]
async fn test_dataset_download_without_data_is_invalid_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/d-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"datasetId": "d-2", "name": "Empty"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .datasets()
        .download_data("d-2", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_data_versions_listing_is_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dataset-data-versions"))
        .and(query_param("datasetIds", "d-1"))
        .and(query_param("teamIds", TEAM_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(json!([
            {"datasetDataVersionId": "dv-1", "status": "current"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .datasets()
        .list_data_versions("d-1", Default::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].status.as_deref(), Some("current"));
}
