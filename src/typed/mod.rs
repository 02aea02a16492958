//! Typed Group Clients
//!
//! One client per API group version served by the spike control plane. Each
//! binds a [`RestInterface`](crate::rest::RestInterface) to its group version;
//! resource-level operations are layered on top of [`rest_client`](ConfigV1alpha2Interface::rest_client).

pub mod config_v1alpha2;
pub mod spike_v1alpha1;

pub use config_v1alpha2::{ConfigV1alpha2Client, ConfigV1alpha2Interface};
pub use spike_v1alpha1::{SpikeV1alpha1Client, SpikeV1alpha1Interface};

use crate::config::{GroupVersion, RestConfig};
use crate::rest::default_user_agent;

/// Path prefix every named API group is served under
const API_GROUP_PATH: &str = "/apis";

/// Bind a configuration copy to one group version under `/apis`
fn set_config_defaults(config: &mut RestConfig, group_version: GroupVersion) {
    config.group_version = Some(group_version);
    config.api_path = API_GROUP_PATH.to_string();
    if config.user_agent.is_empty() {
        config.user_agent = default_user_agent();
    }
}
