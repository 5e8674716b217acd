//! Blocking client.
//!
//! Every method here has the same contract as its async counterpart in
//! [`crate::api`]: the same requests, team scoping, retry policy and errors.
//! Calls are driven to completion on a private current-thread runtime, so
//! retry backoff blocks the calling thread.
//!
//! Do not use this client from inside an async runtime: blocking on a
//! runtime from within another one panics. Use the async
//! [`ModeratelyClient`](crate::ModeratelyClient) there instead.
//!
//! # Example
//!
//! ```no_run
//! use moderately_client::blocking;
//!
//! # fn example() -> moderately_client::Result<()> {
//! let client = blocking::ModeratelyClient::from_env()?;
//! for file in client.files().list(Default::default())?.items {
//!     println!("{} {:?}", file.file_id, file.name);
//! }
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::api::{
    self, ListAgentExecutionsQuery, ListAgentsQuery, ListConfigurationVersionsQuery,
    ListDatasetsQuery, ListFilesQuery, ListPipelineExecutionsQuery, ListPipelinesQuery,
    ListTeamsQuery, ListUsersQuery, ListVersionsQuery, WaitOptions,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::schema::SampleSchemaOptions;
use crate::types::*;
use crate::upload::UploadFile;

/// Generates a blocking wrapper around an async API struct. Each listed
/// method forwards its arguments and blocks on the result.
macro_rules! blocking_api {
    (
        $(#[$meta:meta])*
        pub struct $name:ident wraps $async_ty:ty {
            $(
                $(#[$fmeta:meta])*
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)* $(,)?) -> $ret:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            inner: $async_ty,
            runtime: Arc<Runtime>,
        }

        impl $name {
            $(
                $(#[$fmeta])*
                pub fn $method(&self $(, $arg: $arg_ty)*) -> $ret {
                    self.runtime.block_on(self.inner.$method($($arg),*))
                }
            )*
        }
    };
}

/// Blocking Moderately API client.
///
/// Cheap to clone; clones share configuration, connection pool and runtime.
#[derive(Clone)]
pub struct ModeratelyClient {
    inner: crate::ModeratelyClient,
    runtime: Arc<Runtime>,
}

impl ModeratelyClient {
    /// Create a new client builder. Finish with
    /// [`ClientBuilder::build_blocking`](crate::ClientBuilder::build_blocking).
    pub fn builder() -> crate::ClientBuilder {
        crate::ClientBuilder::new()
    }

    /// Create a client from `MODERATELY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        crate::ClientBuilder::from_env().build_blocking()
    }

    /// Wrap an async client.
    pub fn from_async(inner: crate::ModeratelyClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// The underlying async client.
    pub fn as_async(&self) -> &crate::ModeratelyClient {
        &self.inner
    }

    /// The immutable configuration.
    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// The team this client is scoped to.
    pub fn team_id(&self) -> &str {
        self.inner.team_id()
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Execute a raw request. See [`crate::ModeratelyClient::execute`].
    pub fn execute<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.block_on(self.inner.execute(descriptor))
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi {
            inner: self.inner.users(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the teams API.
    pub fn teams(&self) -> TeamsApi {
        TeamsApi {
            inner: self.inner.teams(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the agents API.
    pub fn agents(&self) -> AgentsApi {
        AgentsApi {
            inner: self.inner.agents(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the agent executions API.
    pub fn agent_executions(&self) -> AgentExecutionsApi {
        AgentExecutionsApi {
            inner: self.inner.agent_executions(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the datasets API.
    pub fn datasets(&self) -> DatasetsApi {
        DatasetsApi {
            inner: self.inner.datasets(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the pipelines API.
    pub fn pipelines(&self) -> PipelinesApi {
        PipelinesApi {
            inner: self.inner.pipelines(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the pipeline configuration versions API.
    pub fn pipeline_configuration_versions(&self) -> PipelineConfigurationVersionsApi {
        PipelineConfigurationVersionsApi {
            inner: self.inner.pipeline_configuration_versions(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the pipeline executions API.
    pub fn pipeline_executions(&self) -> PipelineExecutionsApi {
        PipelineExecutionsApi {
            inner: self.inner.pipeline_executions(),
            runtime: self.runtime.clone(),
        }
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi {
            inner: self.inner.files(),
            runtime: self.runtime.clone(),
        }
    }
}

impl std::fmt::Debug for ModeratelyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::ModeratelyClient")
            .field("config", self.inner.config())
            .finish_non_exhaustive()
    }
}

blocking_api! {
    /// Blocking users API.
    pub struct UsersApi wraps api::UsersApi {
        /// List users in the team.
        fn list(&self, query: ListUsersQuery) -> Result<Page<User>>;
        /// Get a user by ID.
        fn retrieve(&self, id: &str) -> Result<User>;
        /// Update a user's profile.
        fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User>;
    }
}

blocking_api! {
    /// Blocking teams API.
    pub struct TeamsApi wraps api::TeamsApi {
        /// List teams visible to the caller.
        fn list(&self, query: ListTeamsQuery) -> Result<Page<Team>>;
        /// Get a team by ID.
        fn retrieve(&self, id: &str) -> Result<Team>;
        /// The team this client is scoped to.
        fn current(&self) -> Result<Team>;
        /// Update a team.
        fn update(&self, id: &str, request: UpdateTeamRequest) -> Result<Team>;
    }
}

blocking_api! {
    /// Blocking agents API.
    pub struct AgentsApi wraps api::AgentsApi {
        /// List agents in the team.
        fn list(&self, query: ListAgentsQuery) -> Result<Page<Agent>>;
        /// Get an agent by ID.
        fn retrieve(&self, id: &str) -> Result<Agent>;
        /// Create an agent in the team.
        fn create(&self, request: CreateAgentRequest) -> Result<Agent>;
        /// Update an agent.
        fn update(&self, id: &str, request: UpdateAgentRequest) -> Result<Agent>;
        /// Delete an agent.
        fn delete(&self, id: &str) -> Result<()>;
    }
}

blocking_api! {
    /// Blocking agent executions API.
    pub struct AgentExecutionsApi wraps api::AgentExecutionsApi {
        /// List agent executions in the team.
        fn list(&self, query: ListAgentExecutionsQuery) -> Result<Page<AgentExecution>>;
        /// Get an execution by ID.
        fn retrieve(&self, id: &str) -> Result<AgentExecution>;
        /// Start an agent execution.
        fn create(&self, request: CreateAgentExecutionRequest) -> Result<AgentExecution>;
        /// Cancel a running execution.
        fn cancel(&self, id: &str) -> Result<AgentExecution>;
    }
}

blocking_api! {
    /// Blocking datasets API.
    pub struct DatasetsApi wraps api::DatasetsApi {
        /// List datasets in the team.
        fn list(&self, query: ListDatasetsQuery) -> Result<Page<Dataset>>;
        /// Get a dataset by ID.
        fn retrieve(&self, id: &str) -> Result<Dataset>;
        /// Create a dataset in the team.
        fn create(&self, request: CreateDatasetRequest) -> Result<Dataset>;
        /// Update a dataset.
        fn update(&self, id: &str, request: UpdateDatasetRequest) -> Result<Dataset>;
        /// Delete a dataset.
        fn delete(&self, id: &str) -> Result<()>;
        /// Register an already uploaded file as a new data version.
        fn create_data_version(
            &self,
            dataset_id: &str,
            request: CreateDataVersionRequest,
        ) -> Result<DatasetDataVersion>;
        /// List data versions of a dataset.
        fn list_data_versions(
            &self,
            dataset_id: &str,
            query: ListVersionsQuery,
        ) -> Result<Page<DatasetDataVersion>>;
        /// Upload a file and make it the dataset's current data.
        fn upload_data(&self, dataset_id: &str, file: UploadFile) -> Result<DatasetDataVersion>;
        /// Read a file from disk and upload it as the dataset's current data.
        fn upload_data_path(&self, dataset_id: &str, path: &Path) -> Result<DatasetDataVersion>;
        /// Download a data version, or the current one.
        fn download_data(&self, dataset_id: &str, version_id: Option<&str>) -> Result<Bytes>;
        /// Download a data version to `path`.
        fn download_data_to(
            &self,
            dataset_id: &str,
            version_id: Option<&str>,
            path: &Path,
        ) -> Result<u64>;
        /// Create a schema version.
        fn create_schema_version(
            &self,
            dataset_id: &str,
            request: CreateSchemaVersionRequest,
        ) -> Result<DatasetSchemaVersion>;
        /// Infer columns from a CSV sample and create a schema version.
        fn create_schema_from_sample(
            &self,
            dataset_id: &str,
            sample: &[u8],
            options: SampleSchemaOptions,
        ) -> Result<DatasetSchemaVersion>;
        /// Read a CSV sample from disk and create a schema version from it.
        fn create_schema_from_sample_path(
            &self,
            dataset_id: &str,
            path: &Path,
            options: SampleSchemaOptions,
        ) -> Result<DatasetSchemaVersion>;
        /// The dataset's current schema version, if it has one.
        fn get_current_schema(&self, dataset_id: &str) -> Result<Option<DatasetSchemaVersion>>;
        /// List schema versions of a dataset.
        fn list_schema_versions(
            &self,
            dataset_id: &str,
            query: ListVersionsQuery,
        ) -> Result<Page<DatasetSchemaVersion>>;
    }
}

blocking_api! {
    /// Blocking pipelines API.
    pub struct PipelinesApi wraps api::PipelinesApi {
        /// List pipelines in the team.
        fn list(&self, query: ListPipelinesQuery) -> Result<Page<Pipeline>>;
        /// Get a pipeline by ID.
        fn retrieve(&self, id: &str) -> Result<Pipeline>;
        /// Create a pipeline in the team.
        fn create(&self, request: CreatePipelineRequest) -> Result<Pipeline>;
        /// Update a pipeline.
        fn update(&self, id: &str, request: UpdatePipelineRequest) -> Result<Pipeline>;
        /// Delete a pipeline.
        fn delete(&self, id: &str) -> Result<()>;
    }
}

blocking_api! {
    /// Blocking pipeline configuration versions API.
    pub struct PipelineConfigurationVersionsApi wraps api::PipelineConfigurationVersionsApi {
        /// List configuration versions in the team.
        fn list(
            &self,
            query: ListConfigurationVersionsQuery,
        ) -> Result<Page<PipelineConfigurationVersion>>;
        /// Get a configuration version by ID.
        fn retrieve(&self, id: &str) -> Result<PipelineConfigurationVersion>;
        /// Create a configuration version.
        fn create(
            &self,
            request: CreateConfigurationVersionRequest,
        ) -> Result<PipelineConfigurationVersion>;
        /// Update a configuration version.
        fn update(
            &self,
            id: &str,
            request: UpdateConfigurationVersionRequest,
        ) -> Result<PipelineConfigurationVersion>;
        /// Copy a configuration version into a new draft.
        fn clone_version(&self, id: &str) -> Result<PipelineConfigurationVersion>;
        /// Check a configuration document without saving it.
        fn validate(&self, configuration: &Value) -> Result<ValidationReport>;
    }
}

blocking_api! {
    /// Blocking pipeline executions API.
    pub struct PipelineExecutionsApi wraps api::PipelineExecutionsApi {
        /// List executions in the team.
        fn list(&self, query: ListPipelineExecutionsQuery) -> Result<Page<PipelineExecution>>;
        /// Get an execution by ID.
        fn retrieve(&self, id: &str) -> Result<PipelineExecution>;
        /// Start an execution of a configuration version.
        fn create(&self, request: CreatePipelineExecutionRequest) -> Result<PipelineExecution>;
        /// Cancel a pending or running execution.
        fn cancel(&self, id: &str) -> Result<PipelineExecution>;
        /// Fetch the output of an execution.
        fn output(&self, id: &str) -> Result<Value>;
        /// Poll an execution until it reaches a terminal status.
        fn wait(&self, id: &str, options: WaitOptions) -> Result<PipelineExecution>;
    }
}

blocking_api! {
    /// Blocking files API.
    pub struct FilesApi wraps api::FilesApi {
        /// List files in the team.
        fn list(&self, query: ListFilesQuery) -> Result<Page<File>>;
        /// Get file metadata by ID.
        fn retrieve(&self, id: &str) -> Result<File>;
        /// Delete a file.
        fn delete(&self, id: &str) -> Result<()>;
        /// Upload a file.
        fn upload(&self, file: UploadFile) -> Result<File>;
        /// Read a file from disk and upload it.
        fn upload_path(&self, path: &Path) -> Result<File>;
        /// Get a presigned download URL for a file.
        fn download_url(&self, id: &str) -> Result<String>;
        /// Download a file's contents.
        fn download(&self, id: &str) -> Result<Bytes>;
        /// Download a file to `path`.
        fn download_to(&self, id: &str, path: &Path) -> Result<u64>;
    }
}
