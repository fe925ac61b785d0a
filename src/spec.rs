//! src/spec.rs
use crate::configuration::Settings;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutput {
    path: PathBuf,
    num_tasks: u32,
    combine: bool,
}

impl JobOutput {
    pub fn new(path: impl Into<PathBuf>, num_tasks: u32, combine: bool) -> Self {
        JobOutput {
            path: path.into(),
            num_tasks,
            combine,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_tasks(&self) -> u32 {
        self.num_tasks
    }

    pub fn combine(&self) -> bool {
        self.combine
    }
}

#[derive(Debug, Clone)]
pub struct JobSpecification {
    work_dir: PathBuf,
    inputs: Vec<PathBuf>,
    cache_files: Vec<PathBuf>,
    output: Option<JobOutput>,
    machines: u16,
    split_size_in_bytes: u64,
    keep_intermediate: bool,
}

impl JobSpecification {
    pub fn new(work_dir: impl Into<PathBuf>, machines: u16, split_size_in_bytes: u64) -> Self {
        JobSpecification {
            work_dir: work_dir.into(),
            inputs: vec![],
            cache_files: vec![],
            output: None,
            machines,
            split_size_in_bytes,
            keep_intermediate: false,
        }
    }

    /// Everything but the inputs, output and cache files.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut spec = Self::new(
            &settings.job.work_dir,
            settings.cluster.workers,
            settings.job.split_size_in_bytes,
        );
        spec.set_keep_intermediate(settings.job.keep_intermediate);
        spec
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn add_input(&mut self, input: impl Into<PathBuf>) {
        self.inputs.push(input.into());
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn add_cache_file(&mut self, path: impl Into<PathBuf>) {
        self.cache_files.push(path.into());
    }

    pub fn cache_files(&self) -> &[PathBuf] {
        &self.cache_files
    }

    pub fn set_output(&mut self, output: JobOutput) {
        self.output = Some(output);
    }

    pub fn output(&self) -> Option<&JobOutput> {
        self.output.as_ref()
    }

    pub fn machines(&self) -> u16 {
        self.machines
    }

    pub fn split_size_in_bytes(&self) -> u64 {
        self.split_size_in_bytes
    }

    pub fn set_keep_intermediate(&mut self, keep: bool) {
        self.keep_intermediate = keep;
    }

    pub fn keep_intermediate(&self) -> bool {
        self.keep_intermediate
    }

    pub fn validate(&self) -> anyhow::Result<&JobOutput> {
        if self.inputs.is_empty() {
            anyhow::bail!("A job needs at least one input path");
        }
        if self.machines == 0 {
            anyhow::bail!("A job needs at least one worker");
        }
        if self.split_size_in_bytes == 0 {
            anyhow::bail!("Split size must be at least one byte");
        }
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("A job needs an output"))?;
        if output.num_tasks() == 0 {
            anyhow::bail!("A job needs at least one reduce task");
        }
        Ok(output)
    }
}
