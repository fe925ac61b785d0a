//! src/functions.rs
use crate::error::PipelineError;

pub type Key = String;
pub type Count = u64;

/// A token paired with the number of times it was seen.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountRecord {
    key: Key,
    count: Count,
}

impl CountRecord {
    pub fn new(key: impl Into<Key>, count: Count) -> Self {
        CountRecord {
            key: key.into(),
            count,
        }
    }

    pub fn unit(key: impl Into<Key>) -> Self {
        Self::new(key, 1)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn count(&self) -> Count {
        self.count
    }

    pub fn into_parts(self) -> (Key, Count) {
        (self.key, self.count)
    }
}

/// One input record: the byte offset of the line within its split and the line itself.
#[derive(Debug)]
pub struct MapInput {
    key: Key,
    value: String,
}

impl MapInput {
    pub fn new(key: impl Into<Key>, value: impl Into<String>) -> Self {
        MapInput {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

pub struct ReduceInput<I: Iterator<Item = Count>> {
    key: Key,
    values: I,
}

impl<I: Iterator<Item = Count>> ReduceInput<I> {
    pub fn new(key: impl Into<Key>, values: I) -> Self {
        ReduceInput {
            key: key.into(),
            values,
        }
    }

    pub fn into_parts(self) -> (Key, I) {
        (self.key, self.values)
    }
}

pub trait MapEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError>;
}

pub trait Mapper {
    fn map<E: MapEmitter>(&self, input: &MapInput, emitter: &mut E) -> Result<(), PipelineError>;
}

pub trait ReduceEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError>;
}

pub trait Reducer {
    fn reduce<I, E>(&self, input: ReduceInput<I>, emitter: &mut E) -> Result<(), PipelineError>
    where
        I: Iterator<Item = Count>,
        E: ReduceEmitter;
}

/// Collects everything emitted into memory.
#[derive(Debug, Default)]
pub struct VecEmitter {
    records: Vec<CountRecord>,
}

impl VecEmitter {
    pub fn records(&self) -> &[CountRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CountRecord> {
        self.records
    }
}

impl MapEmitter for VecEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError> {
        self.records.push(record);
        Ok(())
    }
}

impl ReduceEmitter for VecEmitter {
    fn emit(&mut self, record: CountRecord) -> Result<(), PipelineError> {
        self.records.push(record);
        Ok(())
    }
}
