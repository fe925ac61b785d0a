//! src/combiner.rs
//!
//! Worker-local pre-aggregation. Merging is checked addition over `u64`,
//! which is associative and commutative, so records may be combined at any
//! granularity (or not at all) without changing the reduce output.
use crate::error::{OverflowError, PipelineError};
use crate::functions::{Count, CountRecord, Key, MapEmitter};
use std::collections::HashMap;

pub fn merge_counts(total: Count, addend: Count) -> Result<Count, OverflowError> {
    total.checked_add(addend).ok_or(OverflowError {
        key: None,
        total,
        addend,
    })
}

/// Folds a batch of records into one record per token.
pub fn combine<I>(records: I) -> Result<Vec<CountRecord>, OverflowError>
where
    I: IntoIterator<Item = CountRecord>,
{
    let mut buffer = HashMap::<Key, Count>::new();
    for record in records {
        merge_into(&mut buffer, record)?;
    }
    Ok(buffer
        .into_iter()
        .map(|(key, count)| CountRecord::new(key, count))
        .collect())
}

fn merge_into(buffer: &mut HashMap<Key, Count>, record: CountRecord) -> Result<(), OverflowError> {
    let (key, count) = record.into_parts();
    match buffer.get_mut(&key) {
        Some(total) => *total = merge_counts(*total, count).map_err(|e| e.for_key(&key))?,
        None => {
            buffer.insert(key, count);
        }
    }
    Ok(())
}

/// Buffers everything a worker's mapper emits and hands one merged record
/// per token downstream on `flush_into`.
#[derive(Debug, Default)]
pub struct CombiningEmitter {
    buffer: HashMap<Key, Count>,
    input_records: u64,
}

impl CombiningEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_records(&self) -> u64 {
        self.input_records
    }

    pub fn pending_keys(&self) -> usize {
        self.buffer.len()
    }

    /// Drains the buffer into `downstream` and returns how many records were
    /// emitted.
    pub fn flush_into<E: MapEmitter>(&mut self, downstream: &mut E) -> Result<u64, PipelineError> {
        let mut emitted = 0;
        for (key, count) in self.buffer.drain() {
            downstream.emit(CountRecord::new(key, count))?;
            emitted += 1;
        }
        self.input_records = 0;
        Ok(emitted)
    }
}

impl MapEmitter for CombiningEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError> {
        self.input_records += 1;
        merge_into(&mut self.buffer, record)?;
        Ok(())
    }
}
