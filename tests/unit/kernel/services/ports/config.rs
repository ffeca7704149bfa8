use super::*;

#[test]
fn test_default_config() {
    let config = PipelineConfig::default();
    assert_eq!(config.debounce(), Duration::from_millis(300));
    assert_eq!(config.tick_interval(), Duration::from_millis(16));
    assert_eq!(config.worker_threads, 2);
    assert_eq!(config.catalog_latency(), Duration::ZERO);
}

#[test]
fn test_tick_interval_never_zero() {
    let config = PipelineConfig {
        tick_interval_ms: 0,
        ..PipelineConfig::default()
    };
    assert_eq!(config.tick_interval(), Duration::from_millis(1));
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let config: PipelineConfig = serde_json::from_str(r#"{"debounce_ms": 120}"#).unwrap();
    assert_eq!(config.debounce_ms, 120);
    assert_eq!(config.tick_interval_ms, 16);
    assert_eq!(config.catalog_latency_ms, 0);
}
