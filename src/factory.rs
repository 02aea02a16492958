//! # Client Factory Contract
//!
//! Every client a clientset aggregates, typed group clients and the discovery
//! client alike, is built through the same three constructors.

use std::sync::Arc;

use crate::config::RestConfig;
use crate::error::ClientResult;
use crate::rest::RestInterface;

/// Uniform construction contract for clients aggregated by a clientset
pub trait ClientFactory: Sized {
    /// Human-readable client name used in diagnostics
    const NAME: &'static str;

    /// Build a client from a transport configuration.
    ///
    /// The configuration is borrowed; implementations copy it before applying
    /// their own defaults.
    fn new_for_config(config: &RestConfig) -> ClientResult<Self>;

    /// Build a client from a transport configuration, aborting on failure.
    ///
    /// # Panics
    ///
    /// Panics if [`ClientFactory::new_for_config`] returns an error.
    fn new_for_config_or_die(config: &RestConfig) -> Self {
        match Self::new_for_config(config) {
            Ok(client) => client,
            Err(e) => panic!("failed to create the {}: {}", Self::NAME, e),
        }
    }

    /// Wrap an already-configured request-dispatch handle. Never fails.
    fn new(handle: Arc<dyn RestInterface>) -> Self;
}
