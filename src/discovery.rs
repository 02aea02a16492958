//! # Discovery Client
//!
//! Answers which API groups, versions and resources the server supports.
//!
//! ```rust,no_run
//! use spike_clientset::{ClientFactory, DiscoveryClient, DiscoveryInterface, RestConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let discovery = DiscoveryClient::new_for_config(&RestConfig::new("https://api.example.com"))?;
//! for group in discovery.server_groups().await?.groups {
//!     println!("{} -> {:?}", group.name, group.preferred_version);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::{GroupVersion, RestConfig};
use crate::error::{ClientError, ClientResult};
use crate::factory::ClientFactory;
use crate::rest::{default_user_agent, RestClient, RestInterface};

/// Prefix under which the legacy core group is served
pub const LEGACY_API_PREFIX: &str = "/api";

/// Prefix under which named API groups are served
pub const API_GROUP_PREFIX: &str = "/apis";

/// Versions of the legacy core group, as served at `/api`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersions {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// All named API groups, as served at `/apis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroupList {
    #[serde(default)]
    pub groups: Vec<ApiGroup>,
}

/// One API group and the versions it serves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroup {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<GroupVersionForDiscovery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_version: Option<GroupVersionForDiscovery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupVersionForDiscovery {
    /// `group/version`, or the bare version for the legacy group
    pub group_version: String,
    pub version: String,
}

/// Resources served by one group version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceList {
    #[serde(default)]
    pub group_version: String,
    #[serde(default)]
    pub resources: Vec<ApiResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    pub name: String,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub namespaced: bool,
    pub kind: String,
    #[serde(default)]
    pub verbs: Vec<String>,
}

impl ApiResource {
    /// Checks that given verb is supported on this resource.
    pub fn supports_verb(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v == verb)
    }
}

/// Server build information, as served at `/version`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
    #[serde(default)]
    pub git_version: String,
    #[serde(default)]
    pub git_commit: String,
    #[serde(default)]
    pub platform: String,
}

/// Capability-discovery operations
#[async_trait]
pub trait DiscoveryInterface: Send + Sync + fmt::Debug {
    /// Request-dispatch handle discovery queries go through
    fn rest_client(&self) -> &Arc<dyn RestInterface>;

    /// Every group the server supports, legacy core group first
    async fn server_groups(&self) -> ClientResult<ApiGroupList>;

    /// Resources served under one `group/version` (or bare legacy version)
    async fn server_resources_for_group_version(
        &self,
        group_version: &str,
    ) -> ClientResult<ApiResourceList>;

    /// Server build information
    async fn server_version(&self) -> ClientResult<VersionInfo>;
}

/// Discovery client backed by a [`RestInterface`]
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    rest_client: Arc<dyn RestInterface>,
}

impl DiscoveryClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.rest_client.get_json(path).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::invalid_response(path, e.to_string()))
    }

    /// Like [`DiscoveryClient::get`], but a 404 yields the empty value
    async fn get_or_default<T: DeserializeOwned + Default>(&self, path: &str) -> ClientResult<T> {
        match self.get(path).await {
            Err(e) if e.is_not_found() => {
                debug!(path, "Discovery endpoint not served, treating as empty");
                Ok(T::default())
            }
            other => other,
        }
    }
}

#[async_trait]
impl DiscoveryInterface for DiscoveryClient {
    fn rest_client(&self) -> &Arc<dyn RestInterface> {
        &self.rest_client
    }

    async fn server_groups(&self) -> ClientResult<ApiGroupList> {
        let legacy: ApiVersions = self.get_or_default(LEGACY_API_PREFIX).await?;
        let mut group_list: ApiGroupList = self.get_or_default(API_GROUP_PREFIX).await?;

        if !legacy.versions.is_empty() {
            let versions: Vec<GroupVersionForDiscovery> = legacy
                .versions
                .iter()
                .map(|v| GroupVersionForDiscovery {
                    group_version: v.clone(),
                    version: v.clone(),
                })
                .collect();
            let legacy_group = ApiGroup {
                name: String::new(),
                preferred_version: versions.first().cloned(),
                versions,
            };
            group_list.groups.insert(0, legacy_group);
        }

        debug!(groups = group_list.groups.len(), "Discovered server groups");
        Ok(group_list)
    }

    async fn server_resources_for_group_version(
        &self,
        group_version: &str,
    ) -> ClientResult<ApiResourceList> {
        let gv: GroupVersion = group_version.parse()?;
        let path = if gv.is_legacy() {
            format!("{}/{}", LEGACY_API_PREFIX, gv.version)
        } else {
            format!("{}/{}/{}", API_GROUP_PREFIX, gv.group, gv.version)
        };

        let mut resources: ApiResourceList = self.get(&path).await?;
        if resources.group_version.is_empty() {
            resources.group_version = gv.to_string();
        }
        Ok(resources)
    }

    async fn server_version(&self) -> ClientResult<VersionInfo> {
        self.get("/version").await
    }
}

impl ClientFactory for DiscoveryClient {
    const NAME: &'static str = "DiscoveryClient";

    fn new_for_config(config: &RestConfig) -> ClientResult<Self> {
        let mut config = config.clone();
        config.group_version = None;
        config.api_path = String::new();
        if config.user_agent.is_empty() {
            config.user_agent = default_user_agent();
        }
        let client = RestClient::unversioned_for_config(&config)?;
        Ok(Self {
            rest_client: Arc::new(client),
        })
    }

    fn new(handle: Arc<dyn RestInterface>) -> Self {
        Self {
            rest_client: handle,
        }
    }
}
