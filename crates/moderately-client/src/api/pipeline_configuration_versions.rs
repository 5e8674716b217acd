//! Pipeline configuration versions API.

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::ModeratelyClient;
use crate::error::Result;
use crate::types::{
    CreateConfigurationVersionRequest, OrderDirection, Page, PipelineConfigurationVersion,
    UpdateConfigurationVersionRequest, ValidationReport,
};

const BASE: &str = "pipeline-configuration-versions";

/// Query parameters for listing configuration versions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfigurationVersionsQuery {
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
    /// Only versions of these pipelines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pipeline_ids: Vec<String>,
    /// Filter by status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Pipeline configuration versions API client.
pub struct PipelineConfigurationVersionsApi {
    client: ModeratelyClient,
}

impl PipelineConfigurationVersionsApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List configuration versions in the team.
    pub async fn list(
        &self,
        query: ListConfigurationVersionsQuery,
    ) -> Result<Page<PipelineConfigurationVersion>> {
        self.client.list(BASE, &query).await
    }

    /// Get a configuration version by ID.
    pub async fn retrieve(&self, id: &str) -> Result<PipelineConfigurationVersion> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    /// Create a configuration version.
    pub async fn create(
        &self,
        request: CreateConfigurationVersionRequest,
    ) -> Result<PipelineConfigurationVersion> {
        self.client.create(BASE, &request).await
    }

    /// Update a configuration version.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateConfigurationVersionRequest,
    ) -> Result<PipelineConfigurationVersion> {
        self.client.patch(&format!("{}/{}", BASE, id), &request).await
    }

    /// Copy a configuration version into a new draft.
    pub async fn clone_version(&self, id: &str) -> Result<PipelineConfigurationVersion> {
        self.client
            .post(&format!("{}/{}/clone", BASE, id), &json!({}))
            .await
    }

    /// Check a configuration document without saving it.
    pub async fn validate(&self, configuration: &Value) -> Result<ValidationReport> {
        self.client
            .post(
                &format!("{}/validate", BASE),
                &json!({ "configuration": configuration }),
            )
            .await
    }
}
