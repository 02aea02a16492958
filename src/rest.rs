//! # REST Transport
//!
//! Low-level request-dispatch handle shared by the typed group clients and the
//! discovery client. It owns the HTTP connection pool, authentication and the
//! throttling policy resolved from a [`RestConfig`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::config::{GroupVersion, RestConfig};
use crate::error::{ClientError, ClientResult};
use crate::rate_limit::{RateLimiter, TokenBucketRateLimiter};

/// Sustained queries per second used when a configuration leaves `qps` at zero
pub const DEFAULT_QPS: f32 = 5.0;

/// Burst used when a configuration leaves `qps` at zero
pub const DEFAULT_BURST: u32 = 10;

/// User agent applied by the client factories when the configuration has none
pub fn default_user_agent() -> String {
    format!("spike-clientset/{}", env!("CARGO_PKG_VERSION"))
}

/// Request-dispatch capability every client wraps
#[async_trait]
pub trait RestInterface: Send + Sync + fmt::Debug {
    /// Server root every absolute path is resolved against
    fn base_url(&self) -> &Url;

    /// Path prefix for this client's API group (`/apis`, or empty)
    fn api_path(&self) -> &str;

    /// Group version this handle was configured for, if any
    fn group_version(&self) -> Option<&GroupVersion>;

    /// Throttling policy applied before each request
    fn rate_limiter(&self) -> Option<&Arc<dyn RateLimiter>>;

    /// Issue a GET for an absolute server path and decode the JSON body
    async fn get_json(&self, path: &str) -> ClientResult<serde_json::Value>;
}

#[derive(Clone)]
enum Credentials {
    Bearer(String),
    Basic {
        username: String,
        password: Option<String>,
    },
}

/// reqwest-backed implementation of [`RestInterface`]
pub struct RestClient {
    client: Client,
    base_url: Url,
    api_path: String,
    group_version: Option<GroupVersion>,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    credentials: Option<Credentials>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_path", &self.api_path)
            .field(
                "group_version",
                &self.group_version.as_ref().map(ToString::to_string),
            )
            .field("rate_limiter", &self.rate_limiter)
            .field("auth_enabled", &self.credentials.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create a client for a group-versioned API; `config.group_version` must be set
    pub fn for_config(config: &RestConfig) -> ClientResult<Self> {
        if config.group_version.is_none() {
            return Err(ClientError::config_error(
                "group version is required when initializing a REST client",
            ));
        }
        Self::unversioned_for_config(config)
    }

    /// Create a client that is not bound to any group version (used for discovery)
    pub fn unversioned_for_config(config: &RestConfig) -> ClientResult<Self> {
        let base_url = parse_host(&config.host)?;
        let credentials = resolve_credentials(config)?;

        let user_agent = if config.user_agent.is_empty() {
            default_user_agent()
        } else {
            config.user_agent.clone()
        };

        let mut client_builder = Client::builder().user_agent(user_agent);
        if config.timeout_ms > 0 {
            client_builder = client_builder.timeout(Duration::from_millis(config.timeout_ms));
        }
        let client = client_builder.build().map_err(|e| {
            ClientError::config_error(format!("Failed to create HTTP client: {}", e))
        })?;

        let rate_limiter = resolve_rate_limiter(config);

        info!(
            base_url = %base_url,
            group_version = ?config.group_version.as_ref().map(ToString::to_string),
            throttled = rate_limiter.is_some(),
            "Created RestClient"
        );

        Ok(Self {
            client,
            base_url,
            api_path: config.api_path.clone(),
            group_version: config.group_version.clone(),
            rate_limiter,
            credentials,
        })
    }

    fn url_for(&self, path: &str) -> ClientResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            ClientError::config_error(format!("Invalid request path '{}': {}", path, e))
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(Credentials::Bearer(token)) => request.bearer_auth(token),
            Some(Credentials::Basic { username, password }) => {
                request.basic_auth(username, password.as_ref())
            }
            None => request,
        }
    }
}

#[async_trait]
impl RestInterface for RestClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn api_path(&self) -> &str {
        &self.api_path
    }

    fn group_version(&self) -> Option<&GroupVersion> {
        self.group_version.as_ref()
    }

    fn rate_limiter(&self) -> Option<&Arc<dyn RateLimiter>> {
        self.rate_limiter.as_ref()
    }

    async fn get_json(&self, path: &str) -> ClientResult<serde_json::Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let url = self.url_for(path)?;
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!("GET {} failed: {} - {}", path, status, error_text);
            Err(ClientError::api_error(status.as_u16(), error_text))
        }
    }
}

fn parse_host(host: &str) -> ClientResult<Url> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ClientError::config_error(
            "host must be a URL or a host:port pair",
        ));
    }

    let candidate = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };

    let url = Url::parse(&candidate).map_err(|e| {
        ClientError::config_error(format!("Invalid host '{}': {}", host, e))
    })?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ClientError::config_error(format!(
            "host must be a URL or a host:port pair: '{}'",
            host
        )));
    }
    Ok(url)
}

fn resolve_credentials(config: &RestConfig) -> ClientResult<Option<Credentials>> {
    let bearer = config.bearer_token.as_ref().filter(|t| !t.is_empty());
    let username = config.username.as_ref().filter(|u| !u.is_empty());

    match (bearer, username) {
        (Some(_), Some(_)) => Err(ClientError::config_error(
            "username/password or bearer token may be set, but not both",
        )),
        (Some(token), None) => Ok(Some(Credentials::Bearer(token.clone()))),
        (None, Some(username)) => Ok(Some(Credentials::Basic {
            username: username.clone(),
            password: config.password.clone(),
        })),
        (None, None) => Ok(None),
    }
}

/// Throttling the transport applies when it dispatches requests.
///
/// An explicit limiter wins. Otherwise `qps == 0` selects the package defaults,
/// negative `qps` disables throttling, and positive `qps` builds a token bucket.
fn resolve_rate_limiter(config: &RestConfig) -> Option<Arc<dyn RateLimiter>> {
    if let Some(limiter) = &config.rate_limiter {
        return Some(Arc::clone(limiter));
    }

    let (qps, burst) = if config.qps == 0.0 {
        (DEFAULT_QPS, DEFAULT_BURST)
    } else {
        (config.qps, config.burst)
    };
    if qps > 0.0 {
        Some(Arc::new(TokenBucketRateLimiter::new(qps, burst)))
    } else {
        None
    }
}
