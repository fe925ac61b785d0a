//! tests/api/helpers.rs
use filtered_wordcount::configuration::TelemetrySettings;
use filtered_wordcount::job::{JobReport, run_job};
use filtered_wordcount::output::read_output;
use filtered_wordcount::spec::{JobOutput, JobSpecification};
use filtered_wordcount::telemetry::init_tracing;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use uuid::Uuid;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let settings = TelemetrySettings {
        log_level: "error".to_string(),
        otlp_enabled: false,
    };
    init_tracing("tests::api", &settings).expect("Failed to setup tracing");
});

pub fn test_data_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path
}

/// A throwaway directory holding one job's inputs, work dir and output.
pub struct TestJob {
    pub root: PathBuf,
    pub workers: u16,
    pub reduce_tasks: u32,
    pub split_size_in_bytes: u64,
    pub combine: bool,
    inputs: Vec<PathBuf>,
    filters: Vec<PathBuf>,
}

impl TestJob {
    pub fn new() -> Self {
        LazyLock::force(&TRACING);
        let root = PathBuf::from(format!("/tmp/filtered-wordcount-tests/{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("Failed to create test directory");
        Self {
            root,
            workers: 2,
            reduce_tasks: 2,
            split_size_in_bytes: 64,
            combine: true,
            inputs: vec![],
            filters: vec![],
        }
    }

    pub fn write_input(&mut self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.root.join("input").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, lines.join("\n")).expect("Failed to write input");
        path
    }

    pub fn add_input(&mut self, path: impl AsRef<Path>) {
        self.inputs.push(path.as_ref().to_path_buf());
    }

    pub fn write_filter(&mut self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("Failed to write filter");
        self.filters.push(path.clone());
        path
    }

    pub fn add_filter(&mut self, path: impl AsRef<Path>) {
        self.filters.push(path.as_ref().to_path_buf());
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join("work")
    }

    pub fn spec(&self) -> JobSpecification {
        let mut spec =
            JobSpecification::new(self.work_dir(), self.workers, self.split_size_in_bytes);
        for input in &self.inputs {
            spec.add_input(input);
        }
        for filter in &self.filters {
            spec.add_cache_file(filter);
        }
        spec.set_output(JobOutput::new(
            self.output_dir(),
            self.reduce_tasks,
            self.combine,
        ));
        spec
    }

    pub async fn run(&self) -> anyhow::Result<JobReport> {
        run_job(self.spec()).await
    }

    pub fn totals(&self) -> BTreeMap<String, u64> {
        read_output(&self.output_dir()).expect("Failed to read job output")
    }
}

impl Drop for TestJob {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
    pairs
        .iter()
        .map(|(key, count)| (key.to_string(), *count))
        .collect()
}
