//! src/master.rs
use crate::{
    counters::TaskCounters,
    mapreduce::InputSplit,
    worker::{JobContext, Worker, WorkerId},
};
use anyhow::Context;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    InProgress,
    Completed,
    Failed,
}

#[derive(Clone, Debug)]
pub struct MapTask {
    pub task_id: Uuid,
    pub state: TaskState,
    pub worker_id: Option<WorkerId>,
    pub input_split: InputSplit,
}

#[derive(Clone, Debug)]
pub struct ReduceTask {
    pub task_id: Uuid,
    pub state: TaskState,
    pub worker_id: Option<WorkerId>,
    pub partition: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Map,
    Reduce,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Map => write!(f, "map"),
            Phase::Reduce => write!(f, "reduce"),
        }
    }
}

#[derive(Debug)]
pub struct Master {
    workers: Vec<Arc<Worker>>,
    map_tasks: Vec<MapTask>,
    reduce_tasks: Vec<ReduceTask>,
    ctx: Arc<JobContext>,
}

impl Master {
    pub fn new(mut workers: Vec<Worker>, input_splits: &[InputSplit], ctx: JobContext) -> Self {
        let mut map_tasks: Vec<MapTask> = input_splits
            .iter()
            .map(|input_split| MapTask {
                task_id: Uuid::new_v4(),
                state: TaskState::Idle,
                worker_id: None,
                input_split: input_split.clone(),
            })
            .collect();

        let mut reduce_tasks: Vec<ReduceTask> = (0..ctx.reduce_tasks)
            .map(|partition| ReduceTask {
                task_id: Uuid::new_v4(),
                state: TaskState::Idle,
                worker_id: None,
                partition,
            })
            .collect();

        assign_tasks(&mut workers, &mut map_tasks, &mut reduce_tasks);

        Master {
            workers: workers.into_iter().map(Arc::new).collect(),
            map_tasks,
            reduce_tasks,
            ctx: Arc::new(ctx),
        }
    }

    pub fn workers(&self) -> &[Arc<Worker>] {
        &self.workers
    }

    pub fn task_count(&self) -> usize {
        self.map_tasks.len() + self.reduce_tasks.len()
    }

    pub fn map_tasks(&self) -> &[MapTask] {
        &self.map_tasks
    }

    pub fn reduce_tasks(&self) -> &[ReduceTask] {
        &self.reduce_tasks
    }

    /// Runs the map phase on every worker, waits for all of them, and only
    /// then starts the reduce phase.
    #[tracing::instrument(name = "Run master", skip_all)]
    pub async fn run(&mut self) -> Result<TaskCounters, anyhow::Error> {
        let mut counters = self.run_phase(Phase::Map).await?;
        std::fs::create_dir_all(&self.ctx.output_dir).context(format!(
            "Failed to create output directory {}",
            self.ctx.output_dir.display()
        ))?;
        counters.merge(&self.run_phase(Phase::Reduce).await?);
        Ok(counters)
    }

    async fn run_phase(&mut self, phase: Phase) -> Result<TaskCounters, anyhow::Error> {
        let mut handles = Vec::with_capacity(self.workers.len());
        for worker in &self.workers {
            let worker = Arc::clone(worker);
            let ctx = Arc::clone(&self.ctx);
            let span = tracing::info_span!("Worker", worker_id = %worker.id(), %phase);
            let handle = tokio::task::spawn_blocking(move || {
                span.in_scope(|| match phase {
                    Phase::Map => worker.run_map_phase(&ctx),
                    Phase::Reduce => worker.run_reduce_phase(&ctx),
                })
            });
            handles.push(handle);
        }

        let mut counters = TaskCounters::default();
        let mut failure = None;
        for (worker, handle) in self.workers.iter().zip(handles) {
            let result = handle
                .await
                .context(format!("Worker {} panicked during {phase}", worker.id()))?;
            match result {
                Ok(worker_counters) => counters.merge(&worker_counters),
                Err(e) => {
                    tracing::error!(error = ?e, worker_id = %worker.id(), "Worker failed during {phase}");
                    failure.get_or_insert((worker.id().clone(), e));
                }
            }
        }

        let state = if failure.is_some() {
            TaskState::Failed
        } else {
            TaskState::Completed
        };
        self.mark(phase, state);

        match failure {
            Some((worker_id, e)) => Err(anyhow::Error::new(e)
                .context(format!("The {phase} phase failed on worker {worker_id}"))),
            None => Ok(counters),
        }
    }

    fn mark(&mut self, phase: Phase, state: TaskState) {
        match phase {
            Phase::Map => self
                .map_tasks
                .iter_mut()
                .for_each(|task| task.state = state.clone()),
            Phase::Reduce => self
                .reduce_tasks
                .iter_mut()
                .for_each(|task| task.state = state.clone()),
        }
    }
}

fn assign_tasks(workers: &mut [Worker], map_tasks: &mut [MapTask], reduce_tasks: &mut [ReduceTask]) {
    let num_workers = workers.len();
    if num_workers == 0 {
        return;
    }
    for (curr_worker, task) in map_tasks.iter_mut().enumerate() {
        let worker = &mut workers[curr_worker % num_workers];
        task.worker_id = Some(worker.id().clone());
        task.state = TaskState::InProgress;
        worker.assign_map(task.clone());
    }

    for (curr_worker, task) in reduce_tasks.iter_mut().enumerate() {
        let worker = &mut workers[curr_worker % num_workers];
        task.worker_id = Some(worker.id().clone());
        task.state = TaskState::InProgress;
        worker.assign_reduce(task.clone());
    }
}
