//! Users API.

use serde::Serialize;

use crate::client::ModeratelyClient;
use crate::error::Result;
use crate::types::{OrderDirection, Page, UpdateUserRequest, User};

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
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

/// Users API client.
pub struct UsersApi {
    client: ModeratelyClient,
}

impl UsersApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List users in the team.
    pub async fn list(&self, query: ListUsersQuery) -> Result<Page<User>> {
        self.client.list("users", &query).await
    }

    /// Get a user by ID.
    pub async fn retrieve(&self, id: &str) -> Result<User> {
        self.client.get(&format!("users/{}", id)).await
    }

    /// Update a user's profile.
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User> {
        self.client.patch(&format!("users/{}", id), &request).await
    }
}
