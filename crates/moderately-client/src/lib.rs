//! HTTP client SDK for the Moderately AI platform.
//!
//! This crate provides a typed client for the Moderately REST API: agents,
//! datasets, pipelines, files, users and teams.
//!
//! # Example
//!
//! ```no_run
//! use moderately_client::{ModeratelyClient, Result, UploadFile};
//!
//! # async fn example() -> Result<()> {
//! // Reads MODERATELY_API_KEY and MODERATELY_TEAM_ID
//! let client = ModeratelyClient::from_env()?;
//!
//! // List calls are scoped to the configured team
//! let datasets = client.datasets().list(Default::default()).await?;
//! println!("{} datasets", datasets.pagination.total_items);
//!
//! // Upload a file through a presigned URL
//! let file = client
//!     .files()
//!     .upload(UploadFile::from_path("report.csv").await?)
//!     .await?;
//! println!("Uploaded {}", file.file_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Request layer
//!
//! Every call goes through one executor that attaches the bearer token,
//! adds the team to list queries (`teamIds`) and create bodies (`teamId`),
//! retries transient failures with exponential backoff and maps error
//! statuses to [`Error`] variants. See [`RetryPolicy`] for the defaults.
//!
//! # Blocking client
//!
//! With the `blocking` feature (on by default),
//! [`blocking::ModeratelyClient`] exposes the same API without `async`.

pub mod api;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod retry;
pub mod schema;
pub mod transport;
pub mod types;
pub mod upload;

pub use client::{ClientBuilder, ModeratelyClient};
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, FieldError, Result};
pub use request::{RequestDescriptor, TeamScope};
pub use retry::RetryPolicy;
pub use schema::SampleSchemaOptions;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::*;
pub use upload::UploadFile;

// Re-export API types that are commonly used with query methods
pub use api::{
    ListAgentExecutionsQuery, ListAgentsQuery, ListConfigurationVersionsQuery, ListDatasetsQuery,
    ListFilesQuery, ListPipelineExecutionsQuery, ListPipelinesQuery, ListTeamsQuery,
    ListUsersQuery, ListVersionsQuery, WaitOptions,
};
