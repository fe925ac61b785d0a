//! src/configuration.rs
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub job: JobSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClusterSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub workers: u16,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct JobSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reduce_tasks: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub split_size_in_bytes: u64,
    pub combine: bool,
    pub work_dir: PathBuf,
    pub keep_intermediate: bool,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    pub log_level: String,
    pub otlp_enabled: bool,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(e.into()))?;
    let config_dir = base_path.join("configuration");

    let settings = config::Config::builder()
        .set_default("cluster.workers", 2)?
        .set_default("job.reduce_tasks", 1)?
        .set_default("job.split_size_in_bytes", 64_i64 * 1024 * 1024)?
        .set_default("job.combine", true)?
        .set_default("job.work_dir", "/tmp/filtered-wordcount")?
        .set_default("job.keep_intermediate", false)?
        .set_default("telemetry.log_level", "info")?
        .set_default("telemetry.otlp_enabled", false)?
        .add_source(config::File::from(config_dir.join("base.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("WORDCOUNT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
