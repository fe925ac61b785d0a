//! src/shuffle.rs
use crate::emitter::partition_file_name;
use crate::error::PipelineError;
use crate::functions::{Count, Key};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Every count for every token of one partition, keyed and sorted by token.
pub type Grouped = BTreeMap<Key, Vec<Count>>;

/// Reads partition `partition` from every map output directory under
/// `map_dir` and groups the counts by token. Map directories without a file
/// for this partition are skipped.
#[tracing::instrument(name = "Group partition", skip(map_dir))]
pub fn group_partition(map_dir: &Path, partition: usize) -> Result<Grouped, PipelineError> {
    let mut grouped = Grouped::new();
    let entries = match std::fs::read_dir(map_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(grouped),
        Err(source) => {
            return Err(PipelineError::RecordRead {
                path: map_dir.to_path_buf(),
                source,
            });
        }
    };
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::RecordRead {
            path: map_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path().join(partition_file_name(partition));
        if path.is_file() {
            read_intermediate(&path, &mut grouped)?;
        }
    }
    tracing::debug!(keys = grouped.len(), "partition grouped");
    Ok(grouped)
}

fn read_intermediate(path: &Path, grouped: &mut Grouped) -> Result<(), PipelineError> {
    let read_error = |source| PipelineError::RecordRead {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(read_error)?);
    for line in reader.lines() {
        let line = line.map_err(read_error)?;
        let (key, count) = parse_line(&line).ok_or_else(|| PipelineError::MalformedIntermediate {
            path: path.to_path_buf(),
            line: line.clone(),
        })?;
        grouped.entry(key.to_string()).or_default().push(count);
    }
    Ok(())
}

// Tokens never contain ' ' but may contain '\t', so split on the last tab.
fn parse_line(line: &str) -> Option<(&str, Count)> {
    let (key, count) = line.rsplit_once('\t')?;
    Some((key, count.parse().ok()?))
}
