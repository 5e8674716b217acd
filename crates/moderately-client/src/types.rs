//! Request and response types for the Moderately API.
//!
//! These types mirror the server's API contract. The API speaks camelCase
//! JSON; identifiers are also accepted under a bare `id` key.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

/// One page of a collection listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Paging metadata.
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    pub fn has_next_page(&self) -> bool {
        self.pagination.page < self.pagination.total_pages
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Paging metadata returned alongside list results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    #[serde(alias = "page_size")]
    pub page_size: u32,
    /// Total items across all pages.
    #[serde(alias = "total_items")]
    pub total_items: u64,
    /// Total page count.
    #[serde(alias = "total_pages")]
    pub total_pages: u32,
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

// ─────────────────────────────────────────────────────────────────────────────
// Status helpers
// ─────────────────────────────────────────────────────────────────────────────

fn status_is(status: Option<&str>, candidates: &[&str]) -> bool {
    status.is_some_and(|s| candidates.iter().any(|c| s.eq_ignore_ascii_case(c)))
}

const COMPLETED: &[&str] = &["completed", "succeeded", "success"];
const RUNNING: &[&str] = &["running", "in_progress", "in-progress", "processing"];
const FAILED: &[&str] = &["failed", "error"];
const CANCELLED: &[&str] = &["cancelled", "canceled"];
const PENDING: &[&str] = &["pending", "queued", "created"];

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    #[serde(alias = "id")]
    pub user_id: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Creation time (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time (ISO 8601).
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Full name if known, otherwise email, otherwise the ID.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.email.clone().unwrap_or_else(|| self.user_id.clone())
    }

    /// Whether a first or last name is set.
    pub fn has_name(&self) -> bool {
        [&self.first_name, &self.last_name]
            .iter()
            .any(|n| n.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Parsed creation time.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    /// Whether the user was created within the last 30 days.
    pub fn is_recent(&self) -> bool {
        self.is_recent_at(Utc::now())
    }

    fn is_recent_at(&self, now: DateTime<Utc>) -> bool {
        self.created()
            .is_some_and(|created| now.signed_duration_since(created) <= ChronoDuration::days(30))
    }
}

/// Request to update a user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Teams
// ─────────────────────────────────────────────────────────────────────────────

/// A team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Team ID.
    #[serde(alias = "id")]
    pub team_id: String,
    /// Team name.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request to update a team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Agents
// ─────────────────────────────────────────────────────────────────────────────

/// An agent definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Agent ID.
    #[serde(alias = "id")]
    pub agent_id: String,
    /// Owning team.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Agent name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Agent configuration.
    #[serde(default)]
    pub configuration: Option<Value>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request to create an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    /// Agent name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Agent configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
}

/// Request to update an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
}

/// One run of an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentExecution {
    /// Execution ID.
    #[serde(alias = "id")]
    pub agent_execution_id: String,
    /// Agent that ran.
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Execution status.
    #[serde(default)]
    pub status: Option<String>,
    /// Input payload.
    #[serde(default)]
    pub input: Option<Value>,
    /// Output payload, once available.
    #[serde(default)]
    pub output: Option<Value>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Start time.
    #[serde(default)]
    pub started_at: Option<String>,
    /// Completion time.
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl AgentExecution {
    /// Finished successfully.
    pub fn is_completed(&self) -> bool {
        status_is(self.status.as_deref(), COMPLETED)
    }

    /// Currently running.
    pub fn is_running(&self) -> bool {
        status_is(self.status.as_deref(), RUNNING)
    }

    /// Finished with an error.
    pub fn is_failed(&self) -> bool {
        status_is(self.status.as_deref(), FAILED)
    }

    /// Cancelled before finishing.
    pub fn is_cancelled(&self) -> bool {
        status_is(self.status.as_deref(), CANCELLED)
    }

    /// Waiting to start.
    pub fn is_pending(&self) -> bool {
        status_is(self.status.as_deref(), PENDING)
    }

    /// No further status changes will happen.
    pub fn is_terminal(&self) -> bool {
        self.is_completed() || self.is_failed() || self.is_cancelled()
    }
}

/// Request to start an agent execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentExecutionRequest {
    /// Agent to run.
    pub agent_id: String,
    /// Input payload.
    pub input: Value,
}

// ─────────────────────────────────────────────────────────────────────────────
// Datasets
// ─────────────────────────────────────────────────────────────────────────────

/// A dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Dataset ID.
    #[serde(alias = "id")]
    pub dataset_id: String,
    /// Owning team.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Number of records in the current data version.
    #[serde(default)]
    pub record_count: Option<u64>,
    /// Processing status (`completed`, `processing`, `needs-processing`, `error`).
    #[serde(default)]
    pub processing_status: Option<String>,
    /// Current data version.
    #[serde(default)]
    pub current_data_version_id: Option<String>,
    /// Current schema version.
    #[serde(default)]
    pub current_schema_version_id: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Dataset {
    /// Processing finished.
    pub fn is_processed(&self) -> bool {
        status_is(self.processing_status.as_deref(), &["completed"])
    }

    /// Processing is queued or running.
    pub fn is_processing(&self) -> bool {
        status_is(
            self.processing_status.as_deref(),
            &["processing", "needs-processing"],
        )
    }

    /// Processing failed.
    pub fn has_error(&self) -> bool {
        status_is(self.processing_status.as_deref(), FAILED)
    }
}

/// Request to create a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatasetRequest {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to update a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatasetRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start processing the current data against the current schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_process: Option<bool>,
}

/// One uploaded revision of a dataset's data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDataVersion {
    /// Version ID.
    #[serde(alias = "id")]
    pub dataset_data_version_id: String,
    /// Owning dataset.
    #[serde(default)]
    pub dataset_id: Option<String>,
    /// Sequential version number.
    #[serde(default)]
    pub version_no: Option<u32>,
    /// File holding the data.
    #[serde(default)]
    pub file_id: Option<String>,
    /// File type (`csv`, `xlsx`, ...).
    #[serde(default)]
    pub file_type: Option<String>,
    /// Parsed row count.
    #[serde(default)]
    pub row_count: Option<u64>,
    /// Version status (`current`, `draft`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request to register a data version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDataVersionRequest {
    /// Uploaded file holding the data.
    pub file_id: String,
    /// File type (`csv`, `xlsx`, ...).
    pub file_type: String,
    /// Version status.
    pub status: String,
}

/// A column in a dataset schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaColumn {
    /// Column name.
    pub name: String,
    /// Column type (`string`, `integer`, `float`, `boolean`, `date`, ...).
    #[serde(rename = "type")]
    pub column_type: String,
    /// Whether values are required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaColumn {
    /// Column with a name and type.
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            required: None,
            description: None,
        }
    }
}

/// One revision of a dataset's schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSchemaVersion {
    /// Schema version ID.
    #[serde(alias = "id")]
    pub dataset_schema_version_id: String,
    /// Owning dataset.
    #[serde(default)]
    pub dataset_id: Option<String>,
    /// Status (`draft`, `current`).
    #[serde(default)]
    pub status: Option<String>,
    /// Columns.
    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
    /// Parser options.
    #[serde(default)]
    pub parsing_options: Option<Value>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request to create a schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchemaVersionRequest {
    /// Columns.
    pub columns: Vec<SchemaColumn>,
    /// Status (`draft` or `current`).
    pub status: String,
    /// Parser options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsing_options: Option<Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipelines
// ─────────────────────────────────────────────────────────────────────────────

/// A pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Pipeline ID.
    #[serde(alias = "id")]
    pub pipeline_id: String,
    /// Owning team.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request to create a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineRequest {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to update a pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePipelineRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A versioned pipeline configuration (blocks and connections).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfigurationVersion {
    /// Configuration version ID.
    #[serde(rename = "pipelineConfigurationVersionId", alias = "id")]
    pub configuration_version_id: String,
    /// Owning pipeline.
    #[serde(default)]
    pub pipeline_id: Option<String>,
    /// Sequential version number.
    #[serde(default)]
    pub version: Option<u32>,
    /// Status (`draft`, `published`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// The configuration document.
    #[serde(default)]
    pub configuration: Value,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PipelineConfigurationVersion {
    /// Number of blocks in the configuration.
    pub fn block_count(&self) -> usize {
        match self.configuration.get("blocks") {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(list)) => list.len(),
            _ => 0,
        }
    }

    /// Number of connections in the configuration.
    pub fn connection_count(&self) -> usize {
        self.configuration
            .get("connections")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Request to create a configuration version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationVersionRequest {
    /// Owning pipeline.
    pub pipeline_id: String,
    /// The configuration document.
    pub configuration: Value,
    /// Initial status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request to update a configuration version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigurationVersionRequest {
    /// New configuration document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationReport {
    /// Whether the configuration is usable.
    pub valid: bool,
    /// Blocking problems.
    pub errors: Vec<Value>,
    /// Non-blocking problems.
    pub warnings: Vec<Value>,
}

/// One run of a pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    /// Execution ID.
    #[serde(rename = "pipelineExecutionId", alias = "id")]
    pub execution_id: String,
    /// Configuration version that ran.
    #[serde(rename = "pipelineConfigurationVersionId", default)]
    pub configuration_version_id: Option<String>,
    /// Pipeline that ran.
    #[serde(default)]
    pub pipeline_id: Option<String>,
    /// Status (`pending`, `running`, `completed`, `failed`, `cancelled`).
    #[serde(default)]
    pub status: Option<String>,
    /// Input payload.
    #[serde(default)]
    pub pipeline_input: Option<Value>,
    /// Human-readable input summary.
    #[serde(default)]
    pub pipeline_input_summary: Option<String>,
    /// Progress, 0-100.
    #[serde(default)]
    pub progress_percentage: Option<f64>,
    /// Error message for failed runs.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Start time.
    #[serde(default)]
    pub started_at: Option<String>,
    /// Completion time.
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl PipelineExecution {
    /// Finished successfully.
    pub fn is_completed(&self) -> bool {
        status_is(self.status.as_deref(), COMPLETED)
    }

    /// Currently running.
    pub fn is_running(&self) -> bool {
        status_is(self.status.as_deref(), RUNNING)
    }

    /// Finished with an error.
    pub fn is_failed(&self) -> bool {
        status_is(self.status.as_deref(), FAILED)
    }

    /// Cancelled before finishing.
    pub fn is_cancelled(&self) -> bool {
        status_is(self.status.as_deref(), CANCELLED)
    }

    /// Waiting to start.
    pub fn is_pending(&self) -> bool {
        status_is(self.status.as_deref(), PENDING)
    }

    /// No further status changes will happen.
    pub fn is_terminal(&self) -> bool {
        self.is_completed() || self.is_failed() || self.is_cancelled()
    }
}

/// Request to start a pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineExecutionRequest {
    /// Configuration version to run.
    pub pipeline_configuration_version_id: String,
    /// Input payload.
    pub pipeline_input: Value,
    /// Human-readable input summary.
    pub pipeline_input_summary: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "odt", "rtf", "txt", "md"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "tiff"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "tsv", "json", "xml", "yaml", "yml"];

/// A stored file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// File ID.
    #[serde(alias = "id")]
    pub file_id: String,
    /// Owning team.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the uploaded file.
    #[serde(default)]
    pub original_file_name: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Status (`completed`, `processing`, `error`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// SHA-256 of the contents.
    #[serde(default)]
    pub file_hash: Option<String>,
    /// Caller-supplied metadata.
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl File {
    /// Upload finished and the file is usable.
    pub fn is_ready(&self) -> bool {
        status_is(self.status.as_deref(), &["completed", "ready", "uploaded"])
    }

    /// Still being uploaded or processed.
    pub fn is_processing(&self) -> bool {
        status_is(
            self.status.as_deref(),
            &["processing", "pending", "uploading"],
        )
    }

    /// Processing failed.
    pub fn has_error(&self) -> bool {
        status_is(self.status.as_deref(), FAILED)
    }

    /// Lowercase extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        let name = self
            .original_file_name
            .as_deref()
            .or(self.name.as_deref())?;
        let (stem, ext) = name.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }

    fn mime(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("")
    }

    fn has_extension(&self, candidates: &[&str]) -> bool {
        self.extension()
            .is_some_and(|ext| candidates.contains(&ext.as_str()))
    }

    /// CSV data.
    pub fn is_csv(&self) -> bool {
        self.mime() == "text/csv" || self.has_extension(&["csv"])
    }

    /// Text content.
    pub fn is_text(&self) -> bool {
        self.mime().starts_with("text/") || self.has_extension(TEXT_EXTENSIONS)
    }

    /// A document (PDF, Word, plain text, ...).
    pub fn is_document(&self) -> bool {
        let mime = self.mime();
        mime == "application/pdf"
            || mime == "application/msword"
            || mime.starts_with("application/vnd.openxmlformats-officedocument.wordprocessing")
            || self.has_extension(DOCUMENT_EXTENSIONS)
    }

    /// An image.
    pub fn is_image(&self) -> bool {
        self.mime().starts_with("image/") || self.has_extension(IMAGE_EXTENSIONS)
    }
}

/// Request for a presigned upload slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Name of the file being uploaded.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// MIME type.
    pub mime_type: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Caller-supplied metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// A presigned upload slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    /// ID the file will have once completed.
    #[serde(alias = "id")]
    pub file_id: String,
    /// Presigned URL accepting a `PUT` of the raw bytes.
    #[serde(alias = "presignedUrl", alias = "url")]
    pub upload_url: String,
    /// Extra headers the storage backend expects on the `PUT`.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Completion notice for an upload, used by the server to verify the bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    /// Hex SHA-256 of the uploaded bytes.
    pub file_hash: String,
    /// Size in bytes.
    pub file_size: u64,
}

/// A presigned download link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrl {
    /// Presigned URL accepting an unauthenticated `GET`.
    #[serde(alias = "url", alias = "presignedUrl")]
    pub download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn file(name: &str, mime: Option<&str>, status: Option<&str>) -> File {
        serde_json::from_value(json!({
            "fileId": "f-1",
            "name": name,
            "mimeType": mime,
            "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn test_page_deserialize() {
        let page: Page<File> = serde_json::from_value(json!({
            "items": [{"fileId": "a"}, {"id": "b"}],
            "pagination": {"page": 1, "pageSize": 2, "totalItems": 5, "totalPages": 3}
        }))
        .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.items[1].file_id, "b");
        assert!(page.has_next_page());
    }

    #[test]
    fn test_pagination_snake_case_alias() {
        let p: Pagination = serde_json::from_value(json!({"page": 2, "total_pages": 2})).unwrap();
        assert_eq!(p.total_pages, 2);
        let page = Page::<File> {
            items: Vec::new(),
            pagination: p,
        };
        assert!(!page.has_next_page());
        assert!(page.is_empty());
    }

    #[test]
    fn test_file_accessors() {
        let csv = file("Report.CSV", Some("text/csv"), Some("completed"));
        assert_eq!(csv.extension().as_deref(), Some("csv"));
        assert!(csv.is_csv());
        assert!(csv.is_text());
        assert!(csv.is_ready());
        assert!(!csv.is_image());

        let pdf = file("contract.pdf", Some("application/pdf"), Some("processing"));
        assert!(pdf.is_document());
        assert!(pdf.is_processing());
        assert!(!pdf.is_ready());

        let img = file("photo.jpeg", None, Some("error"));
        assert!(img.is_image());
        assert!(img.has_error());

        let none = file("README", None, None);
        assert_eq!(none.extension(), None);
        assert!(!none.is_ready());
    }

    #[test]
    fn test_user_display_name() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1", "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert!(user.has_name());

        let user: User = serde_json::from_value(json!({"userId": "u-2", "email": "x@y.z"})).unwrap();
        assert_eq!(user.display_name(), "x@y.z");
        assert!(!user.has_name());

        let user: User = serde_json::from_value(json!({"id": "u-3"})).unwrap();
        assert_eq!(user.display_name(), "u-3");
    }

    #[test]
    fn test_user_is_recent() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1", "createdAt": "2024-03-01T12:00:00Z"
        }))
        .unwrap();
        let soon = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(user.is_recent_at(soon));
        assert!(!user.is_recent_at(later));
    }

    #[test]
    fn test_execution_status() {
        let exec: PipelineExecution = serde_json::from_value(json!({
            "pipelineExecutionId": "e-1",
            "pipelineConfigurationVersionId": "cv-1",
            "status": "running",
            "progressPercentage": 42.5
        }))
        .unwrap();
        assert!(exec.is_running());
        assert!(!exec.is_terminal());
        assert_eq!(exec.configuration_version_id.as_deref(), Some("cv-1"));

        let exec: PipelineExecution =
            serde_json::from_value(json!({"id": "e-2", "status": "CANCELLED"})).unwrap();
        assert!(exec.is_cancelled());
        assert!(exec.is_terminal());
    }

    #[test]
    fn test_configuration_counts() {
        let cv: PipelineConfigurationVersion = serde_json::from_value(json!({
            "pipelineConfigurationVersionId": "cv-1",
            "configuration": {
                "blocks": {"input": {}, "llm": {}, "output": {}},
                "connections": [{"source_block_id": "input", "target_block_id": "llm"}]
            }
        }))
        .unwrap();
        assert_eq!(cv.block_count(), 3);
        assert_eq!(cv.connection_count(), 1);
    }

    #[test]
    fn test_dataset_status() {
        let ds: Dataset = serde_json::from_value(json!({
            "datasetId": "d-1", "name": "Sales", "processingStatus": "needs-processing"
        }))
        .unwrap();
        assert!(ds.is_processing());
        assert!(!ds.is_processed());
    }

    #[test]
    fn test_schema_column_type_key() {
        let value = serde_json::to_value(SchemaColumn::new("amount", "float")).unwrap();
        assert_eq!(value, json!({"name": "amount", "type": "float"}));
    }
}
