//! src/cache.rs
//!
//! Job-wide read-only files, copied once into every worker's local directory
//! before its map phase starts.
use anyhow::Context;
use std::path::{Path, PathBuf};

/// What a worker can see of the files staged for it.
pub trait StagedFiles {
    fn local_cache_files(&self) -> &[PathBuf];
}

impl StagedFiles for [PathBuf] {
    fn local_cache_files(&self) -> &[PathBuf] {
        self
    }
}

impl StagedFiles for Vec<PathBuf> {
    fn local_cache_files(&self) -> &[PathBuf] {
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistributedCache {
    files: Vec<PathBuf>,
}

impl DistributedCache {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn add_cache_file(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Copies every cache file into `dir`. A file that cannot be copied is
    /// logged and left out, the same way the filter loader treats an
    /// unreadable file.
    #[tracing::instrument(name = "Localize cache files", skip(self), fields(dir = %dir.display()))]
    pub fn localize(&self, dir: &Path) -> anyhow::Result<LocalCache> {
        std::fs::create_dir_all(dir).context(format!(
            "Failed to create local cache directory: {}",
            dir.display()
        ))?;
        let mut paths = Vec::with_capacity(self.files.len());
        for (i, file) in self.files.iter().enumerate() {
            let name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cache".to_string());
            let local = dir.join(format!("{i}-{name}"));
            match std::fs::copy(file, &local) {
                Ok(bytes) => {
                    tracing::debug!("staged {} ({bytes} bytes)", local.display());
                    paths.push(local);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to stage cache file {}", file.display());
                }
            }
        }
        Ok(LocalCache { paths })
    }
}

/// The local copies a single worker reads from.
#[derive(Debug, Clone, Default)]
pub struct LocalCache {
    paths: Vec<PathBuf>,
}

impl StagedFiles for LocalCache {
    fn local_cache_files(&self) -> &[PathBuf] {
        &self.paths
    }
}
