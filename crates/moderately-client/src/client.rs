//! Main client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use url::Url;

use crate::api::{
    AgentExecutionsApi, AgentsApi, DatasetsApi, FilesApi, PipelineConfigurationVersionsApi,
    PipelineExecutionsApi, PipelinesApi, TeamsApi, UsersApi,
};
use crate::classify::classify;
use crate::config::{
    ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TEAM_ID_ENV,
};
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::retry::{with_retry, RetryPolicy};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::Page;

/// Moderately API client.
///
/// Provides typed access to all platform endpoints. Cheap to clone; clones
/// share configuration and connection pool.
///
/// # Example
///
/// ```no_run
/// use moderately_client::ModeratelyClient;
///
/// # async fn example() -> moderately_client::Result<()> {
/// let client = ModeratelyClient::builder()
///     .api_key("sk-...")
///     .team_id("team-123")
///     .build()?;
///
/// let datasets = client.datasets().list(Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ModeratelyClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ModeratelyClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from `MODERATELY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_env().build()
    }

    /// The immutable configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The team this client is scoped to.
    pub fn team_id(&self) -> &str {
        self.inner.config.team_id()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        self.inner.config.base_url()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the teams API.
    pub fn teams(&self) -> TeamsApi {
        TeamsApi::new(self.clone())
    }

    /// Access the agents API.
    pub fn agents(&self) -> AgentsApi {
        AgentsApi::new(self.clone())
    }

    /// Access the agent executions API.
    pub fn agent_executions(&self) -> AgentExecutionsApi {
        AgentExecutionsApi::new(self.clone())
    }

    /// Access the datasets API.
    pub fn datasets(&self) -> DatasetsApi {
        DatasetsApi::new(self.clone())
    }

    /// Access the pipelines API.
    pub fn pipelines(&self) -> PipelinesApi {
        PipelinesApi::new(self.clone())
    }

    /// Access the pipeline configuration versions API.
    pub fn pipeline_configuration_versions(&self) -> PipelineConfigurationVersionsApi {
        PipelineConfigurationVersionsApi::new(self.clone())
    }

    /// Access the pipeline executions API.
    pub fn pipeline_executions(&self) -> PipelineExecutionsApi {
        PipelineExecutionsApi::new(self.clone())
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a request with authentication, team scoping and retry, and
    /// decode the JSON response as `T`.
    ///
    /// Empty success bodies decode as JSON `null`, so `T` may be `()` or an
    /// `Option`.
    pub async fn execute<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        with_retry(self.inner.config.retry(), move |attempt| {
            self.execute_once(descriptor.clone(), attempt)
        })
        .await
    }

    /// One network round trip, no retry.
    async fn execute_once<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
        attempt: u32,
    ) -> Result<T> {
        let request = descriptor.into_http(&self.inner.config)?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            attempt,
            "Sending request"
        );

        let response = self.inner.transport.send(request).await?;
        tracing::debug!(status = response.status, "Received response");
        decode(response)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(RequestDescriptor::get(path)).await
    }

    /// List a collection, scoped to the configured team.
    pub(crate) async fn list<T, Q>(&self, path: &str, query: &Q) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(RequestDescriptor::list(path).query(query)?)
            .await
    }

    /// Create a resource, scoped to the configured team.
    pub(crate) async fn create<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(RequestDescriptor::create(path).json(body)?)
            .await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(RequestDescriptor::post(path).json(body)?)
            .await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(RequestDescriptor::patch(path).json(body)?)
            .await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let _: IgnoredAny = self.execute(RequestDescriptor::delete(path)).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Presigned transfers
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a request to a presigned storage URL.
    ///
    /// The URL carries its own authorization, so no API key is attached and
    /// no team scoping applies. Retried under the client's policy.
    pub(crate) async fn transfer(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<HttpResponse> {
        let url = Url::parse(url)?;
        let mut headers = headers;
        if let Ok(agent) = HeaderValue::from_str(self.inner.config.user_agent()) {
            headers.insert(USER_AGENT, agent);
        }

        with_retry(self.inner.config.retry(), move |attempt| {
            let request = HttpRequest {
                method: method.clone(),
                url: url.clone(),
                headers: headers.clone(),
                body: body.clone(),
                timeout: Some(self.inner.config.timeout()),
            };
            async move {
                tracing::debug!(
                    method = %request.method,
                    host = request.url.host_str().unwrap_or_default(),
                    attempt,
                    "Sending presigned transfer"
                );
                let response = self.inner.transport.send(request).await?;
                if response.is_success() {
                    Ok(response)
                } else {
                    Err(classify(response.status, &response.headers, &response.body))
                }
            }
        })
        .await
    }

    /// `PUT` raw bytes to a presigned URL.
    pub(crate) async fn put_presigned(
        &self,
        url: &str,
        content_type: &str,
        extra_headers: &std::collections::HashMap<String, String>,
        bytes: Bytes,
    ) -> Result<()> {
        let mut headers = HeaderMap::new();
        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Upload(format!("Invalid upload header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::Upload(format!("Invalid upload header value for {}", name)))?;
            headers.insert(name, value);
        }
        if !headers.contains_key(CONTENT_TYPE) {
            let value = HeaderValue::from_str(content_type)
                .map_err(|_| Error::Upload(format!("Invalid content type: {}", content_type)))?;
            headers.insert(CONTENT_TYPE, value);
        }

        self.transfer(Method::PUT, url, headers, Some(bytes)).await?;
        Ok(())
    }

    /// `GET` the bytes behind a presigned URL.
    pub(crate) async fn get_presigned(&self, url: &str) -> Result<Bytes> {
        let response = self
            .transfer(Method::GET, url, HeaderMap::new(), None)
            .await?;
        Ok(response.body)
    }
}

impl fmt::Debug for ModeratelyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeratelyClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Decode a response: error statuses go through the classifier, success
/// bodies are parsed as JSON.
pub(crate) fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(classify(response.status, &response.headers, &response.body));
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_str("null")?);
    }
    Ok(serde_json::from_slice(&response.body)?)
}

/// Builder for creating a [`ModeratelyClient`].
pub struct ClientBuilder {
    api_key: Option<String>,
    team_id: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            api_key: None,
            team_id: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            user_agent: None,
            transport: None,
        }
    }

    /// Seed a builder from `MODERATELY_API_KEY`, `MODERATELY_TEAM_ID` and
    /// `MODERATELY_BASE_URL`. Later builder calls override these.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Seed a builder from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty(API_KEY_ENV),
            team_id: non_empty(TEAM_ID_ENV),
            base_url: non_empty(BASE_URL_ENV),
            ..Self::new()
        }
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the team all list and create requests are scoped to.
    pub fn team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Shorthand for setting only the attempt count of the retry policy.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = max_attempts;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use a custom transport instead of the default reqwest one.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Validate settings and produce the configuration without a client.
    pub fn build_config(&self) -> Result<ClientConfig> {
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("moderately-client/{}", env!("CARGO_PKG_VERSION")));

        ClientConfig::new(
            self.api_key.clone().unwrap_or_default(),
            self.team_id.clone().unwrap_or_default(),
            self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            self.timeout,
            self.retry.clone(),
            user_agent,
        )
    }

    /// Build the client.
    pub fn build(self) -> Result<ModeratelyClient> {
        let config = self.build_config()?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(ModeratelyClient {
            inner: Arc::new(ClientInner { config, transport }),
        })
    }

    /// Build a blocking client.
    #[cfg(feature = "blocking")]
    pub fn build_blocking(self) -> Result<crate::blocking::ModeratelyClient> {
        crate::blocking::ModeratelyClient::from_async(self.build()?)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("team_id", &self.team_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
