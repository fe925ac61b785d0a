//! src/output.rs
use crate::error::PipelineError;
use crate::functions::{Count, CountRecord, ReduceEmitter};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SUCCESS_MARKER: &str = "_SUCCESS";

pub fn part_file_name(partition: usize) -> String {
    format!("part-r-{:05}", partition)
}

/// Writes final `token\tcount` lines for one reduce partition.
pub struct FileReduceEmitter {
    path: PathBuf,
    writer: BufWriter<File>,
    records: u64,
}

impl FileReduceEmitter {
    pub fn create(output_dir: &Path, partition: usize) -> Result<Self, PipelineError> {
        let path = output_dir.join(part_file_name(partition));
        let file = File::create(&path).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    pub fn close(mut self) -> Result<u64, PipelineError> {
        self.writer.flush().map_err(|source| PipelineError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.records)
    }
}

impl ReduceEmitter for FileReduceEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError> {
        writeln!(self.writer, "{}\t{}", record.key(), record.count()).map_err(|source| {
            PipelineError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        self.records += 1;
        Ok(())
    }
}

pub fn write_success_marker(output_dir: &Path) -> anyhow::Result<()> {
    let path = output_dir.join(SUCCESS_MARKER);
    File::create(&path).context(format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Loads every part file of a finished job.
pub fn read_output(output_dir: &Path) -> anyhow::Result<BTreeMap<String, Count>> {
    let mut totals = BTreeMap::new();
    let mut entries = std::fs::read_dir(output_dir)
        .context(format!("Failed to list output directory {}", output_dir.display()))?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        if !entry.file_name().to_string_lossy().starts_with("part-") {
            continue;
        }
        let contents = std::fs::read_to_string(entry.path())
            .context(format!("Failed to read {}", entry.path().display()))?;
        for line in contents.lines() {
            let (key, count) = line
                .rsplit_once('\t')
                .context(format!("Malformed output line: {line:?}"))?;
            totals.insert(key.to_string(), count.parse()?);
        }
    }
    Ok(totals)
}
