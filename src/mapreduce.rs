//! src/mapreduce.rs
use crate::{file_splitter::FileSplitter, spec::JobSpecification};
use anyhow::Context;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct InputSplit {
    location: PathBuf,
    source: PathBuf,
}

impl InputSplit {
    pub fn new(location: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        InputSplit {
            location: location.into(),
            source: source.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

// Hadoop-style: hidden and bookkeeping files (`.crc`, `_SUCCESS`) are not input.
fn is_visible(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            !name.starts_with('.') && !name.starts_with('_')
        })
        .unwrap_or(false)
}

/// Expands directories to the regular files directly inside them.
fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, anyhow::Error> {
    let mut files = vec![];
    for input in inputs {
        if input.is_dir() {
            let mut entries = std::fs::read_dir(input)
                .context(format!("Failed to list input directory {}", input.display()))?
                .map(|entry| entry.map(|entry| entry.path()))
                .collect::<Result<Vec<_>, _>>()?;
            entries.sort();
            files.extend(
                entries
                    .into_iter()
                    .filter(|path| path.is_file() && is_visible(path)),
            );
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("Input path does not exist: {}", input.display());
        }
    }
    Ok(files)
}

#[tracing::instrument(name = "Split inputs", skip(inputs))]
fn split_inputs(
    inputs: &[PathBuf],
    out_path: &Path,
    split_size_in_bytes: u64,
) -> Result<Vec<InputSplit>, anyhow::Error> {
    let files = resolve_inputs(inputs)?;
    std::fs::create_dir_all(out_path).context("Failed to create split directory")?;
    let mut results = vec![];
    for (i, file) in files.iter().enumerate() {
        tracing::debug!("processing input file: {}", file.display());
        let splitter = FileSplitter::new(
            file.clone(),
            split_size_in_bytes,
            format!("input_{i}"),
            out_path.to_path_buf(),
        );
        let locations = splitter
            .split()
            .context(format!("Failed to split input file {}", file.display()))?;
        results.extend(
            locations
                .into_iter()
                .map(|location| InputSplit::new(location, file)),
        );
    }
    Ok(results)
}

/// Removes a job's intermediate data unless the job asked to keep it.
fn discard_job_dir(spec: &JobSpecification, job_dir: &Path) {
    if spec.keep_intermediate() || !job_dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(job_dir) {
        tracing::warn!(error = %e, "Failed to clean up {}", job_dir.display());
    }
}

/// A planned job: validated, with its inputs already cut into splits under
/// its own job directory.
#[derive(Debug)]
pub struct MapReduce {
    job_id: Uuid,
    job_dir: PathBuf,
    spec: JobSpecification,
    input_splits: Vec<InputSplit>,
}

impl MapReduce {
    #[tracing::instrument(name = "Plan job", skip_all)]
    pub fn new(spec: JobSpecification) -> Result<Self, anyhow::Error> {
        let output = spec.validate()?;
        if output.path().exists() {
            anyhow::bail!("Output directory {} already exists", output.path().display());
        }
        let job_id = Uuid::new_v4();
        let job_dir = spec.work_dir().join(job_id.to_string());
        let input_splits = match split_inputs(
            spec.inputs(),
            &job_dir.join("splits"),
            spec.split_size_in_bytes(),
        ) {
            Ok(input_splits) => input_splits,
            Err(e) => {
                discard_job_dir(&spec, &job_dir);
                return Err(e);
            }
        };
        tracing::info!(%job_id, splits = input_splits.len(), "Job planned");
        Ok(MapReduce {
            job_id,
            job_dir,
            spec,
            input_splits,
        })
    }

    pub fn spec(&self) -> &JobSpecification {
        &self.spec
    }

    pub fn input_splits(&self) -> &[InputSplit] {
        &self.input_splits
    }

    pub fn job_id(&self) -> &Uuid {
        &self.job_id
    }

    pub fn job_dir(&self) -> &Path {
        &self.job_dir
    }

    pub fn discard_intermediate(&self) {
        discard_job_dir(&self.spec, &self.job_dir);
    }
}
