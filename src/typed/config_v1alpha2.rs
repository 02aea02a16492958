//! # config.istio.io/v1alpha2 Client

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::{GroupVersion, RestConfig};
use crate::error::ClientResult;
use crate::factory::ClientFactory;
use crate::rest::{RestClient, RestInterface};

use super::set_config_defaults;

pub const GROUP_NAME: &str = "config.istio.io";
pub const VERSION: &str = "v1alpha2";

/// Capabilities of the config.istio.io/v1alpha2 group
pub trait ConfigV1alpha2Interface: Send + Sync + fmt::Debug {
    /// Request-dispatch handle used to talk to this group
    fn rest_client(&self) -> &Arc<dyn RestInterface>;

    /// The group version this client serves
    fn group_version(&self) -> GroupVersion {
        GroupVersion::new(GROUP_NAME, VERSION)
    }
}

/// Client for the config.istio.io/v1alpha2 group
#[derive(Debug, Clone)]
pub struct ConfigV1alpha2Client {
    rest_client: Arc<dyn RestInterface>,
}

impl ConfigV1alpha2Interface for ConfigV1alpha2Client {
    fn rest_client(&self) -> &Arc<dyn RestInterface> {
        &self.rest_client
    }
}

impl ClientFactory for ConfigV1alpha2Client {
    const NAME: &'static str = "ConfigV1alpha2Client";

    fn new_for_config(config: &RestConfig) -> ClientResult<Self> {
        let mut config = config.clone();
        set_config_defaults(&mut config, GroupVersion::new(GROUP_NAME, VERSION));
        let client = RestClient::for_config(&config)?;
        debug!(group_version = %GroupVersion::new(GROUP_NAME, VERSION), "Created typed client");
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

impl fmt::Display for ConfigV1alpha2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", GROUP_NAME, VERSION)
    }
}
