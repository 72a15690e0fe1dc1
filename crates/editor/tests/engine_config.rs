//! Config problems surface before any GPU work, so these run everywhere.

use editor::{ConfigError, EditorConfig, Engine, EngineError};

#[test]
fn inverted_zoom_radii_are_rejected_at_construction() {
    let mut config = EditorConfig::default();
    config.navigation.min_radius = 60.0;
    config.navigation.max_radius = 50.0;
    let err = Engine::headless(&config, 64, 64).err().expect("invalid config accepted");
    assert!(matches!(err, EngineError::Config(ConfigError::Invalid(_))), "{err}");
}

#[test]
fn zero_object_capacity_is_rejected_at_construction() {
    let config = EditorConfig {
        object_capacity: 0,
        ..EditorConfig::default()
    };
    let err = Engine::headless(&config, 64, 64).err().expect("invalid config accepted");
    assert!(matches!(err, EngineError::Config(_)), "{err}");
}
