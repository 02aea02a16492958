//! # Clientset
//!
//! Aggregates one client per API group plus a discovery client, all built from
//! a single transport configuration.
//!
//! Groups are built in a fixed order: config.istio.io/v1alpha2, then
//! spike.local/v1alpha1, then discovery. When several groups are misconfigured at
//! once, the error from the first one in that order is the one returned.
//!
//! ```rust
//! use spike_clientset::{Clientset, DiscoveryGetter, Interface, RestConfig};
//!
//! let config = RestConfig {
//!     host: "https://api.example.com".to_string(),
//!     qps: 10.0,
//!     burst: 20,
//!     ..Default::default()
//! };
//! let clientset = Clientset::new_for_config(&config).unwrap();
//! assert!(clientset.discovery().is_some());
//! assert_eq!(
//!     clientset.spike_v1alpha1().group_version().to_string(),
//!     "spike.local/v1alpha1"
//! );
//! ```

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::RestConfig;
use crate::discovery::{DiscoveryClient, DiscoveryInterface};
use crate::error::ClientResult;
use crate::factory::ClientFactory;
use crate::rate_limit::default_rate_limiter;
use crate::rest::RestInterface;
use crate::typed::{
    ConfigV1alpha2Client, ConfigV1alpha2Interface, SpikeV1alpha1Client, SpikeV1alpha1Interface,
};

/// Access to a discovery client that may not exist
///
/// Implemented for `Option` so discovery can be probed before a clientset is
/// known to exist: `None::<&Clientset>.discovery()` is `None`.
pub trait DiscoveryGetter {
    fn discovery(&self) -> Option<&dyn DiscoveryInterface>;
}

impl<T: DiscoveryGetter + ?Sized> DiscoveryGetter for &T {
    fn discovery(&self) -> Option<&dyn DiscoveryInterface> {
        (**self).discovery()
    }
}

impl<T: DiscoveryGetter + ?Sized> DiscoveryGetter for Arc<T> {
    fn discovery(&self) -> Option<&dyn DiscoveryInterface> {
        (**self).discovery()
    }
}

impl<T: DiscoveryGetter> DiscoveryGetter for Option<T> {
    fn discovery(&self) -> Option<&dyn DiscoveryInterface> {
        self.as_ref().and_then(|inner| inner.discovery())
    }
}

/// Typed accessors of a clientset
pub trait Interface: DiscoveryGetter + Send + Sync {
    fn config_v1alpha2(&self) -> &dyn ConfigV1alpha2Interface;

    /// Default version of the config.istio.io group.
    #[deprecated(note = "please explicitly pick a version: use `config_v1alpha2`")]
    fn config(&self) -> &dyn ConfigV1alpha2Interface {
        self.config_v1alpha2()
    }

    fn spike_v1alpha1(&self) -> &dyn SpikeV1alpha1Interface;

    /// Default version of the spike.local group.
    #[deprecated(note = "please explicitly pick a version: use `spike_v1alpha1`")]
    fn spike(&self) -> &dyn SpikeV1alpha1Interface {
        self.spike_v1alpha1()
    }
}

/// Contains the clients for groups. Each group has exactly one version included.
///
/// A clientset is the sole owner of its sub-clients; share it behind an `Arc`
/// rather than duplicating it.
///
/// ```compile_fail
/// fn duplicate<T: Clone>(_: &T) {}
/// let clientset = spike_clientset::Clientset::new_for_config(&Default::default()).unwrap();
/// duplicate(&clientset);
/// ```
#[derive(Debug)]
pub struct Clientset {
    discovery: DiscoveryClient,
    config_v1alpha2: ConfigV1alpha2Client,
    spike_v1alpha1: SpikeV1alpha1Client,
}

impl DiscoveryGetter for Clientset {
    fn discovery(&self) -> Option<&dyn DiscoveryInterface> {
        Some(&self.discovery)
    }
}

impl Interface for Clientset {
    fn config_v1alpha2(&self) -> &dyn ConfigV1alpha2Interface {
        &self.config_v1alpha2
    }

    fn spike_v1alpha1(&self) -> &dyn SpikeV1alpha1Interface {
        &self.spike_v1alpha1
    }
}

impl Clientset {
    /// Create a clientset for the given config.
    ///
    /// The config is copied and a default token bucket is installed on the copy
    /// when `qps > 0` and no limiter is set. The caller's config is never modified.
    /// The first factory to fail aborts construction and its error is returned
    /// unchanged.
    pub fn new_for_config(config: &RestConfig) -> ClientResult<Self> {
        let (config_v1alpha2, spike_v1alpha1, discovery) = build_for_config::<
            ConfigV1alpha2Client,
            SpikeV1alpha1Client,
            DiscoveryClient,
        >(config)?;

        Ok(Self {
            discovery,
            config_v1alpha2,
            spike_v1alpha1,
        })
    }

    /// Create a clientset for the given config, aborting on any construction error.
    ///
    /// # Panics
    ///
    /// Panics if any group client or the discovery client rejects the config.
    pub fn new_for_config_or_die(config: &RestConfig) -> Self {
        let (config_v1alpha2, spike_v1alpha1, discovery) = build_for_config_or_die::<
            ConfigV1alpha2Client,
            SpikeV1alpha1Client,
            DiscoveryClient,
        >(config);

        Self {
            discovery,
            config_v1alpha2,
            spike_v1alpha1,
        }
    }

    /// Create a clientset that shares an existing request-dispatch handle. Never fails.
    pub fn new(handle: Arc<dyn RestInterface>) -> Self {
        Self {
            config_v1alpha2: ConfigV1alpha2Client::new(Arc::clone(&handle)),
            spike_v1alpha1: SpikeV1alpha1Client::new(Arc::clone(&handle)),
            discovery: DiscoveryClient::new(handle),
        }
    }
}

fn shallow_copy_with_defaults(config: &RestConfig) -> RestConfig {
    let mut config = config.clone();
    default_rate_limiter(&mut config);
    config
}

/// Build every client in group order, stopping at the first failure
fn build_for_config<A, B, D>(config: &RestConfig) -> ClientResult<(A, B, D)>
where
    A: ClientFactory,
    B: ClientFactory,
    D: ClientFactory,
{
    let config = shallow_copy_with_defaults(config);

    let group_a = A::new_for_config(&config)?;
    let group_b = B::new_for_config(&config)?;

    let discovery = D::new_for_config(&config).map_err(|e| {
        warn!(error = %e, "failed to create the {}", D::NAME);
        e
    })?;

    debug!(host = %config.host, "Created clientset");
    Ok((group_a, group_b, discovery))
}

fn build_for_config_or_die<A, B, D>(config: &RestConfig) -> (A, B, D)
where
    A: ClientFactory,
    B: ClientFactory,
    D: ClientFactory,
{
    let config = shallow_copy_with_defaults(config);

    let group_a = A::new_for_config_or_die(&config);
    let group_b = B::new_for_config_or_die(&config);
    let discovery = D::new_for_config_or_die(&config);

    (group_a, group_b, discovery)
}
