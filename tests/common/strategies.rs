use proptest::prelude::*;
use spike_clientset::RestConfig;

/// Strategy for strictly positive request rates
pub fn positive_qps_strategy() -> impl Strategy<Value = f32> {
    (0.001f32..100_000.0).prop_filter("qps must be positive", |qps| *qps > 0.0)
}

/// Strategy for rates that must never install a limiter
pub fn non_positive_qps_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), Just(-0.0f32), -100_000.0f32..0.0]
}

/// Strategy for burst sizes, including zero
pub fn burst_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), 1u32..1_000]
}

/// Strategy for hosts the REST transport accepts
pub fn host_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http://"), Just("https://"), Just("")],
        "[a-z][a-z0-9]{0,15}(\\.[a-z][a-z0-9]{0,10}){0,2}",
        prop::option::of(1024u16..65535),
    )
        .prop_map(|(scheme, name, port)| match port {
            Some(port) => format!("{}{}:{}", scheme, name, port),
            None => format!("{}{}", scheme, name),
        })
}

/// Strategy for configurations without a preset rate limiter
pub fn rest_config_strategy() -> impl Strategy<Value = RestConfig> {
    (
        host_strategy(),
        prop_oneof![positive_qps_strategy(), non_positive_qps_strategy()],
        burst_strategy(),
    )
        .prop_map(|(host, qps, burst)| RestConfig {
            host,
            qps,
            burst,
            ..Default::default()
        })
}
