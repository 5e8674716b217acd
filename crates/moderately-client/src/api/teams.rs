//! Teams API.

use serde::Serialize;

use crate::client::ModeratelyClient;
use crate::error::Result;
use crate::types::{OrderDirection, Page, Team, UpdateTeamRequest};

/// Query parameters for listing teams.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTeamsQuery {
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
}

/// Teams API client.
pub struct TeamsApi {
    client: ModeratelyClient,
}

impl TeamsApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List teams visible to the caller.
    pub async fn list(&self, query: ListTeamsQuery) -> Result<Page<Team>> {
        self.client.list("teams", &query).await
    }

    /// Get a team by ID.
    pub async fn retrieve(&self, id: &str) -> Result<Team> {
        self.client.get(&format!("teams/{}", id)).await
    }

    /// The team this client is scoped to.
    pub async fn current(&self) -> Result<Team> {
        self.retrieve(self.client.team_id()).await
    }

    /// Update a team.
    pub async fn update(&self, id: &str, request: UpdateTeamRequest) -> Result<Team> {
        self.client.patch(&format!("teams/{}", id), &request).await
    }
}
