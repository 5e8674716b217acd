//! Files API, including the presigned upload and download flows.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use crate::client::ModeratelyClient;
use crate::error::{Error, Result};
use crate::types::{
    CompleteUploadRequest, DownloadUrl, File, OrderDirection, Page, UploadSlot, UploadUrlRequest,
};
use crate::upload::UploadFile;

/// Query parameters for listing files.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    /// Page number (1-based).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Field to sort by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
    /// Filter by MIME type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mime_types: Vec<String>,
    /// Filter by status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Files API client.
pub struct FilesApi {
    client: ModeratelyClient,
}

impl FilesApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List files in the team.
    pub async fn list(&self, query: ListFilesQuery) -> Result<Page<File>> {
        self.client.list("files", &query).await
    }

    /// Get file metadata by ID.
    pub async fn retrieve(&self, id: &str) -> Result<File> {
        self.client.get(&format!("files/{}", id)).await
    }

    /// Delete a file.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("files/{}", id)).await
    }

    /// Upload a file.
    ///
    /// Three calls, in order: request a presigned slot, `PUT` the bytes to
    /// it without credentials, then mark the upload complete with the
    /// content hash and size so the server can verify it.
    pub async fn upload(&self, file: UploadFile) -> Result<File> {
        let size = file.size();
        let mime_type = file.resolved_mime_type();
        let file_hash = file.sha256_hex();

        let slot: UploadSlot = self
            .client
            .create(
                "files/upload-url",
                &UploadUrlRequest {
                    file_name: file.file_name.clone(),
                    file_size: size,
                    mime_type: mime_type.clone(),
                    name: file.name.clone(),
                    metadata: file.metadata.clone(),
                },
            )
            .await?;
        if slot.file_id.is_empty() || slot.upload_url.is_empty() {
            return Err(Error::Upload(
                "Upload slot response is missing fileId or uploadUrl".to_string(),
            ));
        }
        tracing::info!(file_id = %slot.file_id, size, "Upload slot issued");

        self.client
            .put_presigned(&slot.upload_url, &mime_type, &slot.headers, file.bytes)
            .await?;
        tracing::info!(file_id = %slot.file_id, "Bytes uploaded");

        let completed: File = self
            .client
            .post(
                &format!("files/{}/complete", slot.file_id),
                &CompleteUploadRequest {
                    file_hash,
                    file_size: size,
                },
            )
            .await?;
        tracing::info!(file_id = %completed.file_id, "Upload completed");
        Ok(completed)
    }

    /// Read a file from disk and upload it.
    pub async fn upload_path(&self, path: impl AsRef<Path>) -> Result<File> {
        self.upload(UploadFile::from_path(path).await?).await
    }

    /// Get a presigned download URL for a file.
    pub async fn download_url(&self, id: &str) -> Result<String> {
        let link: DownloadUrl = self.client.get(&format!("files/{}/download", id)).await?;
        Ok(link.download_url)
    }

    /// Download a file's contents.
    pub async fn download(&self, id: &str) -> Result<Bytes> {
        let url = self.download_url(id).await?;
        self.client.get_presigned(&url).await
    }

    /// Download a file to `path`, returning the number of bytes written.
    pub async fn download_to(&self, id: &str, path: impl AsRef<Path>) -> Result<u64> {
        let bytes = self.download(id).await?;
        tokio::fs::write(path.as_ref(), &bytes).await?;
        Ok(bytes.len() as u64)
    }
}
