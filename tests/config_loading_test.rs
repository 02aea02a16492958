//! Integration tests for loading transport configuration from files and environment

use serial_test::serial;
use std::fs;
use tempfile::TempDir;

use spike_clientset::{ClientError, Clientset, DiscoveryGetter, Interface, RestConfig};

const ENV_KEYS: &[&str] = &["SPIKE_HOST", "SPIKE_QPS", "SPIKE_BURST", "SPIKE_BEARER_TOKEN"];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("spike-client.toml");
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
host = "https://spike.example.com:6443"
qps = 25.0
burst = 50
timeout_ms = 15000
bearer_token = "file-token"
"#,
    );

    let config = RestConfig::load_from_file(&path).unwrap();
    assert_eq!(config.host, "https://spike.example.com:6443");
    assert_eq!(config.qps, 25.0);
    assert_eq!(config.burst, 50);
    assert_eq!(config.timeout_ms, 15000);
    assert_eq!(config.bearer_token.as_deref(), Some("file-token"));
    assert!(config.rate_limiter.is_none());
    assert!(config.group_version.is_none());
}

#[test]
#[serial]
fn test_partial_file_keeps_defaults() {
    clear_env();
    let (_dir, path) = write_config("qps = 3\n");

    let config = RestConfig::load_from_file(&path).unwrap();
    assert_eq!(config.host, RestConfig::default().host);
    assert_eq!(config.qps, 3.0);
    assert_eq!(config.burst, 0);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
host = "https://from-file.example.com"
qps = 1.0
"#,
    );
    std::env::set_var("SPIKE_HOST", "https://from-env.example.com");
    std::env::set_var("SPIKE_QPS", "42");

    let config = RestConfig::load_from_file(&path);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.host, "https://from-env.example.com");
    assert_eq!(config.qps, 42.0);
}

#[test]
#[serial]
fn test_missing_file_is_config_error() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let err = RestConfig::load_from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ClientError::ConfigError(_)));
}

#[test]
#[serial]
fn test_malformed_file_is_config_error() {
    clear_env();
    let (_dir, path) = write_config("qps = \"not a number\"\n");
    let err = RestConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ClientError::ConfigError(_)));
}

#[test]
#[serial]
fn test_loaded_config_builds_clientset() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
host = "spike.example.com:8443"
qps = 10.0
burst = 20
"#,
    );

    let config = RestConfig::load_from_file(&path).unwrap();
    let clientset = Clientset::new_for_config(&config).unwrap();

    assert!(clientset.discovery().is_some());
    let limiter = clientset
        .config_v1alpha2()
        .rest_client()
        .rate_limiter()
        .unwrap();
    assert_eq!(limiter.qps(), 10.0);
    assert_eq!(limiter.burst(), 20);
}
