//! src/main.rs
use anyhow::Context;
use clap::Parser;
use filtered_wordcount::configuration::get_configuration;
use filtered_wordcount::job::run_job;
use filtered_wordcount::spec::{JobOutput, JobSpecification};
use filtered_wordcount::telemetry::init_tracing;
use std::path::PathBuf;

/// Counts how often each word of a filter file occurs in a text corpus.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input file or directory of text files
    input: PathBuf,
    /// Output directory; must not exist yet
    output: PathBuf,
    /// Space-separated word list; without it nothing is counted
    filter: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let configuration = get_configuration().context("Failed to read configuration.")?;
    let tracer_provider = init_tracing("filtered-wordcount", &configuration.telemetry)?;

    let mut spec = JobSpecification::from_settings(&configuration);
    spec.add_input(cli.input);
    spec.set_output(JobOutput::new(
        cli.output,
        configuration.job.reduce_tasks,
        configuration.job.combine,
    ));
    if let Some(filter) = cli.filter {
        spec.add_cache_file(filter);
    }

    let result = run_job(spec).await;
    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            eprintln!("Failed to flush traces: {e}");
        }
    }
    let report = result?;
    tracing::info!(
        job_id = %report.job_id,
        output = %report.output_dir.display(),
        "Done"
    );
    Ok(())
}
