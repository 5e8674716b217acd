//! Agents API.

use serde::Serialize;

use crate::client::ModeratelyClient;
use crate::error::Result;
use crate::types::{Agent, CreateAgentRequest, OrderDirection, Page, UpdateAgentRequest};

/// Query parameters for listing agents.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAgentsQuery {
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

/// Agents API client.
pub struct AgentsApi {
    client: ModeratelyClient,
}

impl AgentsApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List agents in the team.
    pub async fn list(&self, query: ListAgentsQuery) -> Result<Page<Agent>> {
        self.client.list("agents", &query).await
    }

    /// Get an agent by ID.
    pub async fn retrieve(&self, id: &str) -> Result<Agent> {
        self.client.get(&format!("agents/{}", id)).await
    }

    /// Create an agent in the team.
    pub async fn create(&self, request: CreateAgentRequest) -> Result<Agent> {
        self.client.create("agents", &request).await
    }

    /// Update an agent.
    pub async fn update(&self, id: &str, request: UpdateAgentRequest) -> Result<Agent> {
        self.client.patch(&format!("agents/{}", id), &request).await
    }

    /// Delete an agent.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("agents/{}", id)).await
    }
}
