//! src/worker.rs
use crate::{
    cache::LocalCache,
    combiner::CombiningEmitter,
    counters::TaskCounters,
    emitter::PartitionedFileEmitter,
    error::PipelineError,
    functions::{MapEmitter, MapInput, Mapper, ReduceInput, Reducer},
    line_reader::LineReader,
    mappers::FilteredTokenizer,
    master::{MapTask, ReduceTask},
    output::FileReduceEmitter,
    reducers::Adder,
    shuffle::group_partition,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerId(Uuid);

impl WorkerId {
    pub fn new() -> Self {
        WorkerId(Uuid::new_v4())
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a job's intermediate and final data live, shared by all workers.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub map_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reduce_tasks: usize,
    pub combine: bool,
}

#[derive(Debug)]
pub struct Worker {
    id: WorkerId,
    cache: LocalCache,
    map_tasks: Vec<MapTask>,
    reduce_tasks: Vec<ReduceTask>,
}

impl Worker {
    pub fn new(cache: LocalCache) -> Self {
        Worker {
            id: WorkerId::new(),
            cache,
            map_tasks: vec![],
            reduce_tasks: vec![],
        }
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    pub fn assign_map(&mut self, task: MapTask) {
        self.map_tasks.push(task);
    }

    pub fn assign_reduce(&mut self, task: ReduceTask) {
        self.reduce_tasks.push(task);
    }

    pub fn has_task(&self) -> bool {
        !self.map_tasks.is_empty() || !self.reduce_tasks.is_empty()
    }

    pub fn map_tasks(&self) -> &[MapTask] {
        &self.map_tasks
    }

    pub fn reduce_tasks(&self) -> &[ReduceTask] {
        &self.reduce_tasks
    }

    /// Loads the filter set once, maps every assigned split with it and
    /// leaves the (optionally combined) output partitioned under
    /// `map_dir/<worker id>`.
    pub fn run_map_phase(&self, ctx: &JobContext) -> Result<TaskCounters, PipelineError> {
        let mut counters = TaskCounters::default();
        if self.map_tasks.is_empty() {
            return Ok(counters);
        }
        let (tokenizer, warnings) = FilteredTokenizer::setup(&self.cache);
        counters.filter_load_warnings = warnings as u64;

        let mut partitioned =
            PartitionedFileEmitter::new(ctx.map_dir.join(self.id.to_string()), ctx.reduce_tasks)?;
        if ctx.combine {
            let mut combiner = CombiningEmitter::new();
            for task in &self.map_tasks {
                map_split(&tokenizer, task.input_split.location(), &mut combiner, &mut counters)?;
            }
            counters.combine_input_records = combiner.input_records();
            counters.map_output_records = combiner.input_records();
            counters.combine_output_records = combiner.flush_into(&mut partitioned)?;
        } else {
            for task in &self.map_tasks {
                map_split(&tokenizer, task.input_split.location(), &mut partitioned, &mut counters)?;
            }
            counters.map_output_records = partitioned.records();
        }
        partitioned.close()?;
        tracing::info!(
            splits = self.map_tasks.len(),
            records = counters.map_input_records,
            emitted = counters.map_output_records,
            "Map phase done"
        );
        Ok(counters)
    }

    pub fn run_reduce_phase(&self, ctx: &JobContext) -> Result<TaskCounters, PipelineError> {
        let mut counters = TaskCounters::default();
        for task in &self.reduce_tasks {
            let grouped = group_partition(&ctx.map_dir, task.partition)?;
            let mut emitter = FileReduceEmitter::create(&ctx.output_dir, task.partition)?;
            counters.reduce_input_groups += grouped.len() as u64;
            for (key, counts) in grouped {
                Adder.reduce(ReduceInput::new(key, counts.into_iter()), &mut emitter)?;
            }
            counters.reduce_output_records += emitter.close()?;
        }
        tracing::info!(
            partitions = self.reduce_tasks.len(),
            records = counters.reduce_output_records,
            "Reduce phase done"
        );
        Ok(counters)
    }
}

/// Feeds every line of one split to the mapper, keyed by its byte offset.
/// Undecodable bytes are replaced, but a split that cannot be opened or read
/// is fatal to the worker.
fn map_split<M: Mapper, E: MapEmitter>(
    mapper: &M,
    location: &Path,
    emitter: &mut E,
    counters: &mut TaskCounters,
) -> Result<(), PipelineError> {
    let read_error = |source| PipelineError::RecordRead {
        path: location.to_path_buf(),
        source,
    };
    let mut lines = LineReader::new(BufReader::new(File::open(location).map_err(read_error)?));
    let mut offset = 0u64;
    while let Some((line, len)) = lines.next_line().map_err(read_error)? {
        mapper.map(&MapInput::new(offset.to_string(), line), emitter)?;
        counters.map_input_records += 1;
        offset += len;
    }
    Ok(())
}
