//! src/test_utils.rs
use crate::configuration::TelemetrySettings;
use crate::telemetry::init_tracing;
use std::path::PathBuf;
use std::sync::LazyLock;
use uuid::Uuid;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let settings = TelemetrySettings {
        log_level: "error".to_string(),
        otlp_enabled: false,
    };
    init_tracing("tests::unit", &settings).expect("Failed to setup tracing");
});

/// A fresh directory under /tmp, unique per call.
pub fn scratch_dir() -> PathBuf {
    LazyLock::force(&TRACING);
    let path = PathBuf::from(format!("/tmp/filtered-wordcount-tests/{}", Uuid::new_v4()));
    std::fs::create_dir_all(&path).expect("Failed to create scratch directory");
    path
}

pub fn test_data_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path
}
