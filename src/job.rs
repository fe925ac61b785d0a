//! src/job.rs
use crate::cache::DistributedCache;
use crate::counters::TaskCounters;
use crate::mapreduce::MapReduce;
use crate::master::Master;
use crate::output::write_success_marker;
use crate::spec::JobSpecification;
use crate::worker::{JobContext, Worker};
use anyhow::Context;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: Uuid,
    pub output_dir: PathBuf,
    pub counters: TaskCounters,
}

/// A planned job with its cache files staged on every worker, ready to run.
#[derive(Debug)]
pub struct MapReduceJob {
    mr: MapReduce,
    master: Master,
}

impl MapReduceJob {
    #[tracing::instrument(name = "Start MapReduceJob", skip_all, fields(job_id = %mr.job_id()))]
    pub fn start(mr: MapReduce) -> Result<Self, anyhow::Error> {
        let workers = match stage_workers(&mr) {
            Ok(workers) => workers,
            Err(e) => {
                mr.discard_intermediate();
                return Err(e);
            }
        };

        let output = mr.spec().validate()?;
        let ctx = JobContext {
            map_dir: mr.job_dir().join("map"),
            output_dir: output.path().to_path_buf(),
            reduce_tasks: output.num_tasks() as usize,
            combine: output.combine(),
        };
        let master = Master::new(workers, mr.input_splits(), ctx);
        Ok(Self { mr, master })
    }

    #[tracing::instrument(name = "Run MapReduceJob", skip_all, fields(job_id = %self.mr.job_id()))]
    pub async fn run(mut self) -> Result<JobReport, anyhow::Error> {
        let result = self.master.run().await;
        self.mr.discard_intermediate();
        let counters = result?;

        let output_dir = self.mr.spec().validate()?.path().to_path_buf();
        write_success_marker(&output_dir)?;
        tracing::info!(?counters, "Job succeeded");
        Ok(JobReport {
            job_id: *self.mr.job_id(),
            output_dir,
            counters,
        })
    }
}

/// Copies the job's cache files into a directory of their own for every worker.
fn stage_workers(mr: &MapReduce) -> Result<Vec<Worker>, anyhow::Error> {
    let spec = mr.spec();
    let cache = DistributedCache::new(spec.cache_files().to_vec());
    let mut workers = Vec::with_capacity(spec.machines() as usize);
    for i in 0..spec.machines() {
        let local = cache
            .localize(&mr.job_dir().join("cache").join(format!("worker-{i}")))
            .context(format!("Failed to stage cache files for worker {i}"))?;
        workers.push(Worker::new(local));
    }
    Ok(workers)
}

/// Plans, stages and runs a job in one go.
pub async fn run_job(spec: JobSpecification) -> Result<JobReport, anyhow::Error> {
    let mr = MapReduce::new(spec).context("Failed to plan job")?;
    MapReduceJob::start(mr)?.run().await
}
