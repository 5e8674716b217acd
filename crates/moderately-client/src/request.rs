//! Request descriptors and their translation into wire requests.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::HttpRequest;

/// Query key carrying the team filter on list requests.
pub const TEAM_QUERY_KEY: &str = "teamIds";

/// Body key carrying the owning team on create requests.
pub const TEAM_BODY_KEY: &str = "teamId";

/// How the configured team is attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamScope {
    /// Not scoped.
    #[default]
    None,
    /// Add `teamIds=<team>` to the query unless already present.
    List,
    /// Add `"teamId": <team>` to the JSON body unless already present.
    Create,
}

/// One API call, before authentication and scoping are applied.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL.
    pub path: String,
    /// Query pairs, in order. Repeated keys are allowed.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Team scoping mode.
    pub scope: TeamScope,
}

impl RequestDescriptor {
    /// A request with no query, body or scoping.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            scope: TeamScope::None,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Team-scoped `GET path` for collection listings.
    pub fn list(path: impl Into<String>) -> Self {
        Self::get(path).scope(TeamScope::List)
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Team-scoped `POST path` for resource creation.
    pub fn create(path: impl Into<String>) -> Self {
        Self::post(path).scope(TeamScope::Create)
    }

    /// `PATCH path`.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the team scoping mode.
    #[must_use]
    pub fn scope(mut self, scope: TeamScope) -> Self {
        self.scope = scope;
        self
    }

    /// Append one query pair.
    #[must_use]
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append the fields of a serializable struct as query pairs.
    ///
    /// `null` fields are skipped and arrays become repeated keys.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        self.query.extend(to_query_pairs(query)?);
        Ok(self)
    }

    /// Set the JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach the team identifier according to [`TeamScope`]. Values the
    /// caller supplied explicitly are left alone.
    pub fn apply_team_scope(&mut self, team_id: &str) {
        match self.scope {
            TeamScope::None => {}
            TeamScope::List => {
                if !self.query.iter().any(|(k, _)| k == TEAM_QUERY_KEY) {
                    self.query
                        .push((TEAM_QUERY_KEY.to_string(), team_id.to_string()));
                }
            }
            TeamScope::Create => match &mut self.body {
                Some(Value::Object(map)) => {
                    map.entry(TEAM_BODY_KEY)
                        .or_insert_with(|| Value::String(team_id.to_string()));
                }
                None => {
                    let mut map = serde_json::Map::new();
                    map.insert(TEAM_BODY_KEY.to_string(), Value::String(team_id.to_string()));
                    self.body = Some(Value::Object(map));
                }
                Some(_) => {}
            },
        }
    }

    /// Build the authenticated wire request.
    pub(crate) fn into_http(mut self, config: &ClientConfig) -> Result<HttpRequest> {
        self.apply_team_scope(config.team_id());

        let mut url = config.endpoint(&self.path)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, config.auth_header().clone());
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(config.user_agent())
            .map_err(|_| Error::Config("Invalid user agent".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let body = match &self.body {
            Some(value) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(Bytes::from(serde_json::to_vec(value)?))
            }
            None => None,
        };

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
            timeout: Some(config.timeout()),
        })
    }
}

/// Flatten a serializable struct into query pairs.
pub(crate) fn to_query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(query)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::Config(format!(
                "Query parameters must serialize to an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_to_string(other) {
                    pairs.push((key, s));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
