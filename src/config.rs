//! # Transport Configuration
//!
//! Connection parameters shared by every client in a clientset: endpoint,
//! authentication and client-side throttling knobs.
//!
//! Supports config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::rate_limit::RateLimiter;

/// Prefix for environment variable overrides (`SPIKE_HOST`, `SPIKE_QPS`, ...)
pub const ENV_PREFIX: &str = "SPIKE";

/// An API group paired with one of its versions
///
/// The legacy core group has an empty group name and renders as the bare version.
///
/// ```rust
/// use spike_clientset::config::GroupVersion;
///
/// let gv: GroupVersion = "spike.local/v1alpha1".parse().unwrap();
/// assert_eq!(gv.group, "spike.local");
/// assert_eq!(gv.version, "v1alpha1");
/// assert_eq!(gv.to_string(), "spike.local/v1alpha1");
///
/// let core: GroupVersion = "v1".parse().unwrap();
/// assert!(core.is_legacy());
/// assert_eq!(core.to_string(), "v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Whether this is the legacy core group served under `/api`
    pub fn is_legacy(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

impl FromStr for GroupVersion {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [version] if !version.is_empty() => Ok(Self::new("", *version)),
            [group, version] if !group.is_empty() && !version.is_empty() => {
                Ok(Self::new(*group, *version))
            }
            _ => Err(ClientError::config_error(format!(
                "unexpected group version string: '{}'",
                s
            ))),
        }
    }
}

/// Transport configuration consumed by every client factory
///
/// `Clone` is a shallow copy: a configured rate limiter is shared between
/// the original and the copy, never rebuilt.
///
/// # Examples
///
/// ```rust
/// use spike_clientset::config::RestConfig;
///
/// let config = RestConfig {
///     host: "https://api.example.com:6443".to_string(),
///     qps: 10.0,
///     burst: 20,
///     ..Default::default()
/// };
/// assert!(config.rate_limiter.is_none());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Server URL or `host:port` pair
    pub host: String,
    /// Path prefix for API requests (`/apis` for named groups, empty for discovery)
    pub api_path: String,
    /// Group version the client is bound to; set by the per-group factories
    #[serde(skip)]
    pub group_version: Option<GroupVersion>,
    /// User agent sent with every request (a default is applied when empty)
    pub user_agent: String,
    /// Bearer token authentication
    pub bearer_token: Option<String>,
    /// Basic authentication username
    pub username: Option<String>,
    /// Basic authentication password
    pub password: Option<String>,
    /// Request timeout in milliseconds (0 disables the timeout)
    pub timeout_ms: u64,
    /// Maximum sustained queries per second
    pub qps: f32,
    /// Maximum burst for throttle
    pub burst: u32,
    /// Pre-built throttling policy; when set, `qps` and `burst` are ignored
    #[serde(skip)]
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:8080".to_string(),
            api_path: String::new(),
            group_version: None,
            user_agent: String::new(),
            bearer_token: None,
            username: None,
            password: None,
            timeout_ms: 0,
            qps: 0.0,
            burst: 0,
            rate_limiter: None,
        }
    }
}

impl fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConfig")
            .field("host", &self.host)
            .field("api_path", &self.api_path)
            .field(
                "group_version",
                &self.group_version.as_ref().map(ToString::to_string),
            )
            .field("user_agent", &self.user_agent)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_ms", &self.timeout_ms)
            .field("qps", &self.qps)
            .field("burst", &self.burst)
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

impl RestConfig {
    /// Create a configuration pointing at `host` with everything else defaulted
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load configuration from config file and environment variables
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`SPIKE_HOST`, `SPIKE_QPS`, ...)
    /// 2. Config file (./spike-client.toml or ~/.spike/config.toml)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let config_path = Self::find_config_file();
        if let Some(ref path) = config_path {
            debug!("Loading client config from: {}", path.display());
        }
        let config = Self::build(config_path.as_deref())?;
        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        if !path.is_file() {
            return Err(ClientError::config_error(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Self::build(Some(path))
    }

    fn build(path: Option<&Path>) -> ClientResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|settings| settings.try_deserialize::<Self>())
            .map_err(|e| ClientError::config_error(format!("Failed to load config: {}", e)))
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![
            PathBuf::from("./spike-client.toml"),
            PathBuf::from("./config/spike-client.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            possible_paths.push(home.join(".spike").join("config.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }
}
