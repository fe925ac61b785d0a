//! src/emitter.rs
use crate::error::PipelineError;
use crate::functions::{CountRecord, MapEmitter};
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stable across processes and runs, so every worker sends a token to the
/// same reduce partition.
pub fn partition_for(key: &str, partitions: usize) -> usize {
    let mut hash = 0usize;
    for byte in key.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(byte as usize);
    }
    hash % partitions
}

pub fn partition_file_name(partition: usize) -> String {
    format!("r-{:04}.txt", partition)
}

/// Writes map output as `token\tcount` lines, one file per reduce partition.
pub struct PartitionedFileEmitter {
    output_dir: PathBuf,
    writers: Vec<Option<BufWriter<File>>>,
    records: u64,
}

impl PartitionedFileEmitter {
    pub fn new(output_dir: impl AsRef<Path>, partitions: usize) -> Result<Self, PipelineError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        create_dir_all(&output_dir).map_err(|source| PipelineError::Write {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self {
            output_dir,
            writers: (0..partitions.max(1)).map(|_| None).collect(),
            records: 0,
        })
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    // Files are created lazily; partitions nobody writes to stay absent.
    fn get_writer(&mut self, partition: usize) -> Result<&mut BufWriter<File>, PipelineError> {
        let slot = &mut self.writers[partition];
        let writer = match slot.take() {
            Some(writer) => writer,
            None => {
                let path = self.output_dir.join(partition_file_name(partition));
                let file =
                    File::create(&path).map_err(|source| PipelineError::Write { path, source })?;
                BufWriter::with_capacity(8192, file)
            }
        };
        Ok(slot.insert(writer))
    }

    pub fn flush_all(&mut self) -> Result<(), PipelineError> {
        for (partition, writer) in self.writers.iter_mut().enumerate() {
            if let Some(writer) = writer {
                writer.flush().map_err(|source| PipelineError::Write {
                    path: self.output_dir.join(partition_file_name(partition)),
                    source,
                })?;
            }
        }
        Ok(())
    }

    pub fn close(mut self) -> Result<u64, PipelineError> {
        self.flush_all()?;
        Ok(self.records)
    }
}

impl MapEmitter for PartitionedFileEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError> {
        let partition = partition_for(record.key(), self.writers.len());
        let writer = self.get_writer(partition)?;
        if let Err(source) = writeln!(writer, "{}\t{}", record.key(), record.count()) {
            return Err(PipelineError::Write {
                path: self.output_dir.join(partition_file_name(partition)),
                source,
            });
        }
        self.records += 1;
        Ok(())
    }
}
