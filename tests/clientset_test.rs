//! Integration tests for clientset construction and accessors

mod common;

use common::mock_handle::MockHandle;
use serde_json::json;
use std::sync::Arc;

use spike_clientset::{
    ClientError, Clientset, DiscoveryGetter, Interface, RateLimiter, RestConfig,
    TokenBucketRateLimiter,
};

fn sample_config() -> RestConfig {
    RestConfig {
        host: "https://spike.example.com:6443".to_string(),
        qps: 10.0,
        burst: 20,
        ..Default::default()
    }
}

#[test]
fn test_new_for_config_populates_every_client() {
    let clientset = Clientset::new_for_config(&sample_config()).unwrap();

    assert!(clientset.discovery().is_some());
    assert_eq!(
        clientset.config_v1alpha2().group_version().to_string(),
        "config.istio.io/v1alpha2"
    );
    assert_eq!(
        clientset.spike_v1alpha1().group_version().to_string(),
        "spike.local/v1alpha1"
    );
    assert_eq!(
        clientset
            .spike_v1alpha1()
            .rest_client()
            .base_url()
            .host_str(),
        Some("spike.example.com")
    );
}

#[test]
fn test_new_for_config_leaves_caller_config_untouched() {
    let config = sample_config();
    let before = format!("{:?}", config);

    let _clientset = Clientset::new_for_config(&config).unwrap();

    assert!(config.rate_limiter.is_none());
    assert!(config.group_version.is_none());
    assert_eq!(config.api_path, "");
    assert_eq!(config.user_agent, "");
    assert_eq!(format!("{:?}", config), before);
}

#[test]
fn test_config_is_reusable_across_clientsets() {
    let config = sample_config();
    let first = Clientset::new_for_config(&config).unwrap();
    let second = Clientset::new_for_config(&config).unwrap();

    let first_limiter = first.config_v1alpha2().rest_client().rate_limiter().unwrap();
    let second_limiter = second.config_v1alpha2().rest_client().rate_limiter().unwrap();
    assert!(!Arc::ptr_eq(first_limiter, second_limiter));
}

#[test]
fn test_preset_limiter_is_used_as_is() {
    let preset: Arc<dyn RateLimiter> = Arc::new(TokenBucketRateLimiter::new(2.5, 3));
    let config = RestConfig {
        rate_limiter: Some(Arc::clone(&preset)),
        ..sample_config()
    };
    let clientset = Clientset::new_for_config(&config).unwrap();

    let used = clientset.spike_v1alpha1().rest_client().rate_limiter().unwrap();
    assert!(Arc::ptr_eq(used, &preset));
}

#[test]
fn test_extremely_slow_qps_still_builds_throttled_clientset() {
    for (qps, burst) in [(1e-11, 1000), (1e-25, 5)] {
        let config = RestConfig {
            qps,
            burst,
            ..sample_config()
        };
        let clientset = Clientset::new_for_config(&config).unwrap();
        let limiter = clientset.spike_v1alpha1().rest_client().rate_limiter().unwrap();

        let accepted = (0..burst + 10).filter(|_| limiter.try_accept()).count();
        assert_eq!(accepted, burst as usize, "qps {qps} should stay throttled");
    }
}

#[test]
fn test_invalid_host_fails_without_clientset() {
    let config = RestConfig {
        host: "http://bad host".to_string(),
        ..sample_config()
    };
    let err = Clientset::new_for_config(&config).unwrap_err();
    assert!(matches!(err, ClientError::ConfigError(_)));
    assert!(err.to_string().contains("bad host"));
}

#[test]
fn test_conflicting_auth_fails_construction() {
    let config = RestConfig {
        bearer_token: Some("token".to_string()),
        username: Some("admin".to_string()),
        ..sample_config()
    };
    assert!(Clientset::new_for_config(&config).is_err());
}

#[test]
#[should_panic(expected = "failed to create the ConfigV1alpha2Client")]
fn test_or_die_panics_on_invalid_host() {
    Clientset::new_for_config_or_die(&RestConfig::new(""));
}

#[test]
fn test_or_die_returns_populated_clientset() {
    let clientset = Clientset::new_for_config_or_die(&sample_config());
    assert!(clientset.discovery().is_some());
    assert_eq!(
        clientset
            .config_v1alpha2()
            .rest_client()
            .rate_limiter()
            .unwrap()
            .burst(),
        20
    );
}

#[test]
fn test_discovery_on_absent_clientset_is_none() {
    let missing: Option<&Clientset> = None;
    assert!(missing.discovery().is_none());

    let missing_owned: Option<Clientset> = None;
    assert!(missing_owned.discovery().is_none());

    let present = Clientset::new_for_config(&sample_config()).ok();
    assert!(present.discovery().is_some());
}

#[test]
#[allow(deprecated)]
fn test_deprecated_accessors_forward_to_explicit_versions() {
    let clientset = Clientset::new_for_config(&sample_config()).unwrap();

    assert!(Arc::ptr_eq(
        clientset.config().rest_client(),
        clientset.config_v1alpha2().rest_client()
    ));
    assert!(Arc::ptr_eq(
        clientset.spike().rest_client(),
        clientset.spike_v1alpha1().rest_client()
    ));
}

#[test]
fn test_clientset_is_usable_as_trait_object() {
    let clientset: Arc<dyn Interface> =
        Arc::new(Clientset::new_for_config(&sample_config()).unwrap());
    assert!(clientset.discovery().is_some());
    assert_eq!(clientset.spike_v1alpha1().group_version().version, "v1alpha1");
}

#[tokio::test]
async fn test_new_from_handle_routes_everything_through_handle() {
    let mock = Arc::new(
        MockHandle::new().with_response("/version", json!({"major": "1", "minor": "27"})),
    );
    let clientset = Clientset::new(mock.clone());

    assert!(clientset.discovery().is_some());
    let version = clientset
        .discovery()
        .unwrap()
        .server_version()
        .await
        .unwrap();
    assert_eq!(version.minor, "27");
    assert_eq!(mock.request_count(), 1);

    assert!(clientset.config_v1alpha2().rest_client().rate_limiter().is_none());
}

#[test]
fn test_accessors_are_shareable_across_threads() {
    let clientset = Arc::new(Clientset::new_for_config(&sample_config()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let clientset = Arc::clone(&clientset);
            std::thread::spawn(move || {
                clientset.spike_v1alpha1().group_version().to_string()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "spike.local/v1alpha1");
    }
}
