//! Agent executions API.

use serde::Serialize;
use serde_json::json;

use crate::client::ModeratelyClient;
use crate::error::Result;
use crate::types::{AgentExecution, CreateAgentExecutionRequest, OrderDirection, Page};

/// Query parameters for listing agent executions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAgentExecutionsQuery {
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
    /// Only executions of these agents.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agent_ids: Vec<String>,
    /// Filter by status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Agent executions API client.
pub struct AgentExecutionsApi {
    client: ModeratelyClient,
}

impl AgentExecutionsApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List agent executions in the team.
    pub async fn list(&self, query: ListAgentExecutionsQuery) -> Result<Page<AgentExecution>> {
        self.client.list("agent-executions", &query).await
    }

    /// Get an execution by ID.
    pub async fn retrieve(&self, id: &str) -> Result<AgentExecution> {
        self.client.get(&format!("agent-executions/{}", id)).await
    }

    /// Start an agent execution.
    pub async fn create(&self, request: CreateAgentExecutionRequest) -> Result<AgentExecution> {
        self.client.create("agent-executions", &request).await
    }

    /// Cancel a running execution.
    pub async fn cancel(&self, id: &str) -> Result<AgentExecution> {
        self.client
            .post(&format!("agent-executions/{}/cancel", id), &json!({}))
            .await
    }
}
