//! Pipelines API.

use serde::Serialize;

use crate::client::ModeratelyClient;
use crate::error::Result;
use crate::types::{CreatePipelineRequest, OrderDirection, Page, Pipeline, UpdatePipelineRequest};

/// Query parameters for listing pipelines.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesQuery {
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

/// Pipelines API client.
pub struct PipelinesApi {
    client: ModeratelyClient,
}

impl PipelinesApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List pipelines in the team.
    pub async fn list(&self, query: ListPipelinesQuery) -> Result<Page<Pipeline>> {
        self.client.list("pipelines", &query).await
    }

    /// Get a pipeline by ID.
    pub async fn retrieve(&self, id: &str) -> Result<Pipeline> {
        self.client.get(&format!("pipelines/{}", id)).await
    }

    /// Create a pipeline in the team.
    pub async fn create(&self, request: CreatePipelineRequest) -> Result<Pipeline> {
        self.client.create("pipelines", &request).await
    }

    /// Update a pipeline.
    pub async fn update(&self, id: &str, request: UpdatePipelineRequest) -> Result<Pipeline> {
        self.client.patch(&format!("pipelines/{}", id), &request).await
    }

    /// Delete a pipeline.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("pipelines/{}", id)).await
    }
}
