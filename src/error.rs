//! src/error.rs
use std::path::PathBuf;

pub fn error_chain_fmt(
    f: &mut std::fmt::Formatter<'_>,
    e: &impl std::error::Error,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// A count sum that no longer fits in a `u64`.
#[derive(thiserror::Error, PartialEq, Eq)]
#[error("Count {total} + {addend} for token {key:?} exceeds u64::MAX")]
pub struct OverflowError {
    pub key: Option<String>,
    pub total: u64,
    pub addend: u64,
}

impl OverflowError {
    pub fn for_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }
}

impl std::fmt::Debug for OverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

#[derive(thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read input records from {}", path.display())]
    RecordRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Overflow(#[from] OverflowError),
    #[error("Failed to write records to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed intermediate record in {}: {line:?}", path.display())]
    MalformedIntermediate { path: PathBuf, line: String },
}

impl std::fmt::Debug for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}
