//! Pipeline executions API.

use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::client::ModeratelyClient;
use crate::error::{Error, Result};
use crate::types::{CreatePipelineExecutionRequest, OrderDirection, Page, PipelineExecution};

const BASE: &str = "pipeline-executions";

/// Keys under which the output endpoint returns a link to externally
/// stored output instead of the output itself.
const OUTPUT_URL_KEYS: [&str; 2] = ["outputUrl", "downloadUrl"];

/// Query parameters for listing pipeline executions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineExecutionsQuery {
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
    /// Only executions of these pipelines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pipeline_ids: Vec<String>,
    /// Only executions of these configuration versions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pipeline_configuration_version_ids: Vec<String>,
    /// Filter by status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Polling settings for [`PipelineExecutionsApi::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after this long.
    pub timeout: Duration,
    /// Delay between status checks.
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Pipeline executions API client.
pub struct PipelineExecutionsApi {
    client: ModeratelyClient,
}

impl PipelineExecutionsApi {
    pub(crate) fn new(client: ModeratelyClient) -> Self {
        Self { client }
    }

    /// List executions in the team.
    pub async fn list(
        &self,
        query: ListPipelineExecutionsQuery,
    ) -> Result<Page<PipelineExecution>> {
        self.client.list(BASE, &query).await
    }

    /// Get an execution by ID.
    pub async fn retrieve(&self, id: &str) -> Result<PipelineExecution> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    /// Start an execution of a configuration version.
    pub async fn create(&self, request: CreatePipelineExecutionRequest) -> Result<PipelineExecution> {
        self.client.create(BASE, &request).await
    }

    /// Cancel a pending or running execution.
    pub async fn cancel(&self, id: &str) -> Result<PipelineExecution> {
        self.client
            .post(&format!("{}/{}/cancel", BASE, id), &json!({}))
            .await
    }

    /// Fetch the output of an execution.
    ///
    /// Large outputs are stored externally; the endpoint then returns a
    /// presigned link, which is followed and parsed as JSON (or returned as
    /// a string if it isn't JSON).
    pub async fn output(&self, id: &str) -> Result<Value> {
        let response: Value = self.client.get(&format!("{}/{}/output", BASE, id)).await?;

        let link = OUTPUT_URL_KEYS
            .iter()
            .find_map(|key| response.get(key).and_then(Value::as_str));
        let Some(url) = link else {
            return Ok(response);
        };

        tracing::debug!(execution_id = id, "Fetching externally stored output");
        let bytes = self.client.get_presigned(url).await?;
        Ok(serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
    }

    /// Poll an execution until it reaches a terminal status.
    ///
    /// Returns the final execution whatever its outcome; a failed run is not
    /// an error here. Fails with [`Error::WaitTimeout`] if the execution is
    /// still active after `options.timeout`.
    pub async fn wait(&self, id: &str, options: WaitOptions) -> Result<PipelineExecution> {
        let start = Instant::now();

        loop {
            let execution = self.retrieve(id).await?;
            if execution.is_terminal() {
                return Ok(execution);
            }

            let elapsed = start.elapsed();
            if elapsed >= options.timeout {
                return Err(Error::WaitTimeout {
                    what: format!("pipeline execution {}", id),
                    elapsed,
                });
            }

            tracing::debug!(
                execution_id = id,
                status = execution.status.as_deref().unwrap_or("unknown"),
                progress = execution.progress_percentage,
                "Execution still active"
            );
            let remaining = options.timeout - elapsed;
            tokio::time::sleep(options.poll_interval.min(remaining)).await;
        }
    }
}
