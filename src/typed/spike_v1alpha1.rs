//! # spike.local/v1alpha1 Client

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::{GroupVersion, RestConfig};
use crate::error::ClientResult;
use crate::factory::ClientFactory;
use crate::rest::{RestClient, RestInterface};

use super::set_config_defaults;

pub const GROUP_NAME: &str = "spike.local";
pub const VERSION: &str = "v1alpha1";

/// Capabilities of the spike.local/v1alpha1 group
pub trait SpikeV1alpha1Interface: Send + Sync + fmt::Debug {
    /// Request-dispatch handle used to talk to this group
    fn rest_client(&self) -> &Arc<dyn RestInterface>;

    /// The group version this client serves
    fn group_version(&self) -> GroupVersion {
        GroupVersion::new(GROUP_NAME, VERSION)
    }
}

/// Client for the spike.local/v1alpha1 group
#[derive(Debug, Clone)]
pub struct SpikeV1alpha1Client {
    rest_client: Arc<dyn RestInterface>,
}

impl SpikeV1alpha1Interface for SpikeV1alpha1Client {
    fn rest_client(&self) -> &Arc<dyn RestInterface> {
        &self.rest_client
    }
}

impl ClientFactory for SpikeV1alpha1Client {
    const NAME: &'static str = "SpikeV1alpha1Client";

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

impl fmt::Display for SpikeV1alpha1Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", GROUP_NAME, VERSION)
    }
}
