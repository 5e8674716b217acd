//! Datasets API.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use crate::client::ModeratelyClient;
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::schema::{infer_columns, SampleSchemaOptions};
use crate::types::{
    CreateDataVersionRequest, CreateDatasetRequest, CreateSchemaVersionRequest, Dataset,
    DatasetDataVersion, DatasetSchemaVersion, DownloadUrl, OrderDirection, Page,
    UpdateDatasetRequest,
};
use crate::upload::{file_type_from_name, UploadFile};

/// Status given to newly uploaded data versions.
const CURRENT: &str = "current";

/// Query parameters for listing datasets.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatasetsQuery {
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
    /// Filter by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Query parameters for listing data or schema versions of a dataset.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsQuery {
    /// Page number (1-based).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Filter by status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Datasets API client.
pub struct DatasetsApi {
    client: ModeratelyClient,
}

impl DatasetsApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List datasets in the team.
    pub async fn list(&self, query: ListDatasetsQuery) -> Result<Page<Dataset>> {
        self.client.list("datasets", &query).await
    }

    /// Get a dataset by ID.
    pub async fn retrieve(&self, id: &str) -> Result<Dataset> {
        self.client.get(&format!("datasets/{}", id)).await
    }

    /// Create a dataset in the team.
    pub async fn create(&self, request: CreateDatasetRequest) -> Result<Dataset> {
        self.client.create("datasets", &request).await
    }

    /// Update a dataset.
    pub async fn update(&self, id: &str, request: UpdateDatasetRequest) -> Result<Dataset> {
        self.client.patch(&format!("datasets/{}", id), &request).await
    }

    /// Delete a dataset.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("datasets/{}", id)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data versions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register an already uploaded file as a new data version.
    pub async fn create_data_version(
        &self,
        dataset_id: &str,
        request: CreateDataVersionRequest,
    ) -> Result<DatasetDataVersion> {
        self.client
            .create(&format!("datasets/{}/data-versions", dataset_id), &request)
            .await
    }

    /// List data versions of a dataset.
    pub async fn list_data_versions(
        &self,
        dataset_id: &str,
        query: ListVersionsQuery,
    ) -> Result<Page<DatasetDataVersion>> {
        let request = RequestDescriptor::list("dataset-data-versions")
            .query(&query)?
            .query_pair("datasetIds", dataset_id);
        self.client.execute(request).await
    }

    /// Upload a file and make it the dataset's current data.
    ///
    /// The file type is taken from the file name extension.
    pub async fn upload_data(
        &self,
        dataset_id: &str,
        file: UploadFile,
    ) -> Result<DatasetDataVersion> {
        let file_type = file_type_from_name(file.file_name());
        let uploaded = self.client.files().upload(file).await?;
        tracing::info!(
            dataset_id,
            file_id = %uploaded.file_id,
            file_type = %file_type,
            "Registering data version"
        );

        self.create_data_version(
            dataset_id,
            CreateDataVersionRequest {
                file_id: uploaded.file_id,
                file_type,
                status: CURRENT.to_string(),
            },
        )
        .await
    }

    /// Read a file from disk and upload it as the dataset's current data.
    pub async fn upload_data_path(
        &self,
        dataset_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<DatasetDataVersion> {
        self.upload_data(dataset_id, UploadFile::from_path(path).await?)
            .await
    }

    /// Download a data version, or the current one when `version_id` is
    /// `None`.
    pub async fn download_data(&self, dataset_id: &str, version_id: Option<&str>) -> Result<Bytes> {
        let version_id = match version_id {
            Some(id) => id.to_string(),
            None => self
                .retrieve(dataset_id)
                .await?
                .current_data_version_id
                .ok_or_else(|| {
                    Error::InvalidState(format!("Dataset {} has no data version", dataset_id))
                })?,
        };

        let link: DownloadUrl = self
            .client
            .get(&format!(
                "datasets/{}/data-versions/{}/download",
                dataset_id, version_id
            ))
            .await?;
        self.client.get_presigned(&link.download_url).await
    }

    /// Download a data version to `path`, returning the number of bytes
    /// written.
    pub async fn download_data_to(
        &self,
        dataset_id: &str,
        version_id: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<u64> {
        let bytes = self.download_data(dataset_id, version_id).await?;
        tokio::fs::write(path.as_ref(), &bytes).await?;
        Ok(bytes.len() as u64)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Schema versions
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a schema version.
    pub async fn create_schema_version(
        &self,
        dataset_id: &str,
        request: CreateSchemaVersionRequest,
    ) -> Result<DatasetSchemaVersion> {
        self.client
            .create(&format!("datasets/{}/schema-versions", dataset_id), &request)
            .await
    }

    /// Infer columns from a CSV sample and create a schema version from
    /// them.
    pub async fn create_schema_from_sample(
        &self,
        dataset_id: &str,
        sample: &[u8],
        options: SampleSchemaOptions,
    ) -> Result<DatasetSchemaVersion> {
        let columns = infer_columns(sample, options.header_row, options.sample_size)?;
        tracing::info!(
            dataset_id,
            columns = columns.len(),
            status = %options.status,
            "Creating schema from sample"
        );

        self.create_schema_version(
            dataset_id,
            CreateSchemaVersionRequest {
                columns,
                parsing_options: Some(options.parsing_options()),
                status: options.status,
            },
        )
        .await
    }

    /// Read a CSV sample from disk and create a schema version from it.
    pub async fn create_schema_from_sample_path(
        &self,
        dataset_id: &str,
        path: impl AsRef<Path>,
        options: SampleSchemaOptions,
    ) -> Result<DatasetSchemaVersion> {
        let sample = tokio::fs::read(path.as_ref()).await?;
        self.create_schema_from_sample(dataset_id, &sample, options)
            .await
    }

    /// The dataset's current schema version, if it has one.
    pub async fn get_current_schema(
        &self,
        dataset_id: &str,
    ) -> Result<Option<DatasetSchemaVersion>> {
        let Some(version_id) = self.retrieve(dataset_id).await?.current_schema_version_id else {
            return Ok(None);
        };
        self.client
            .get(&format!("dataset-schema-versions/{}", version_id))
            .await
            .map(Some)
    }

    /// List schema versions of a dataset.
    pub async fn list_schema_versions(
        &self,
        dataset_id: &str,
        query: ListVersionsQuery,
    ) -> Result<Page<DatasetSchemaVersion>> {
        let request = RequestDescriptor::list("dataset-schema-versions")
            .query(&query)?
            .query_pair("datasetIds", dataset_id);
        self.client.execute(request).await
    }
}
