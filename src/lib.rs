#![allow(clippy::doc_markdown)] // Allow technical terms like config.istio.io in docs
#![allow(clippy::module_name_repetitions)]

//! # Spike Clientset
//!
//! Versioned clientset for the spike control plane.
//!
//! ## Overview
//!
//! A [`Clientset`] owns one typed client per API group version plus a discovery
//! client. All of them are built from a single [`RestConfig`], so they share its
//! endpoint, credentials and throttling policy.
//!
//! ## Module Organization
//!
//! - [`clientset`] - Aggregation, construction order and accessors
//! - [`typed`] - Per-group clients (config.istio.io/v1alpha2, spike.local/v1alpha1)
//! - [`discovery`] - Server capability discovery
//! - [`factory`] - Construction contract shared by every aggregated client
//! - [`rest`] - Low-level request-dispatch handle
//! - [`rate_limit`] - Token bucket throttling and its defaulter
//! - [`config`] - Transport configuration and loading
//! - [`error`] - Structured error handling
//! - [`logging`] - `tracing` subscriber setup for binaries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spike_clientset::{Clientset, DiscoveryGetter, Interface, RestConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RestConfig::load()?;
//! let clientset = Clientset::new_for_config(&config)?;
//!
//! if let Some(discovery) = clientset.discovery() {
//!     let version = discovery.server_version().await?;
//!     println!("server {}", version.git_version);
//! }
//! println!("using {}", clientset.config_v1alpha2().group_version());
//! # Ok(())
//! # }
//! ```

pub mod clientset;
pub mod config;
pub mod discovery;
pub mod error;
pub mod factory;
pub mod logging;
pub mod rate_limit;
pub mod rest;
pub mod typed;

// Re-export commonly used types for convenience
pub use clientset::{Clientset, DiscoveryGetter, Interface};
pub use config::{GroupVersion, RestConfig};
pub use discovery::{DiscoveryClient, DiscoveryInterface};
pub use error::{ClientError, ClientResult};
pub use factory::ClientFactory;
pub use rate_limit::{default_rate_limiter, RateLimiter, TokenBucketRateLimiter};
pub use rest::{RestClient, RestInterface};
pub use typed::{
    ConfigV1alpha2Client, ConfigV1alpha2Interface, SpikeV1alpha1Client, SpikeV1alpha1Interface,
};
