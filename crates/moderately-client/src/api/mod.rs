//! API endpoint implementations.

mod agent_executions;
mod agents;
mod datasets;
mod files;
mod pipeline_configuration_versions;
mod pipeline_executions;
mod pipelines;
mod teams;
mod users;

pub use agent_executions::{AgentExecutionsApi, ListAgentExecutionsQuery};
pub use agents::{AgentsApi, ListAgentsQuery};
pub use datasets::{DatasetsApi, ListDatasetsQuery, ListVersionsQuery};
pub use files::{FilesApi, ListFilesQuery};
pub use pipeline_configuration_versions::{
    ListConfigurationVersionsQuery, PipelineConfigurationVersionsApi,
};
pub use pipeline_executions::{ListPipelineExecutionsQuery, PipelineExecutionsApi, WaitOptions};
pub use pipelines::{ListPipelinesQuery, PipelinesApi};
pub use teams::{ListTeamsQuery, TeamsApi};
pub use users::{ListUsersQuery, UsersApi};
