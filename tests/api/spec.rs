//! tests/api/spec.rs
use claims::{assert_err, assert_none, assert_ok, assert_some};
use filtered_wordcount::spec::{JobOutput, JobSpecification};

#[test]
fn you_should_be_able_to_create_a_job_spec() {
    let spec = JobSpecification::new("/tmp/work", 2, 16);
    assert_eq!(spec.machines(), 2);
    assert_eq!(spec.split_size_in_bytes(), 16);
    assert!(spec.inputs().is_empty());
    assert!(spec.cache_files().is_empty());
    assert!(!spec.keep_intermediate());
}

#[test]
fn you_should_be_able_to_add_inputs_and_cache_files_to_a_job_spec() {
    let mut spec = JobSpecification::new("/tmp/work", 2, 16);

    for i in 0..5 {
        spec.add_input(format!("input_{i}.txt"));
    }
    spec.add_cache_file("words.txt");

    assert_eq!(spec.inputs().len(), 5);
    for (i, input) in spec.inputs().iter().enumerate() {
        assert_eq!(input.to_str().unwrap(), format!("input_{i}.txt"));
    }
    assert_eq!(spec.cache_files()[0].to_str().unwrap(), "words.txt");
}

#[test]
fn you_should_be_able_to_define_a_job_output_on_a_spec() {
    let mut spec = JobSpecification::new("/tmp/work", 2, 16);
    spec.add_input("input_0.txt");

    assert_none!(spec.output());
    assert_err!(spec.validate());

    spec.set_output(JobOutput::new("/root/home/word_counts", 100, true));

    assert_some!(spec.output());
    let output = assert_ok!(spec.validate());
    assert_eq!(output.path().to_str().unwrap(), "/root/home/word_counts");
    assert_eq!(output.num_tasks(), 100);
    assert!(output.combine());
}

#[test]
fn a_spec_without_inputs_workers_or_reducers_should_not_validate() {
    let mut no_inputs = JobSpecification::new("/tmp/work", 2, 16);
    no_inputs.set_output(JobOutput::new("/tmp/out", 1, true));
    assert_err!(no_inputs.validate());

    let mut no_workers = JobSpecification::new("/tmp/work", 0, 16);
    no_workers.add_input("input.txt");
    no_workers.set_output(JobOutput::new("/tmp/out", 1, true));
    assert_err!(no_workers.validate());

    let mut no_reducers = JobSpecification::new("/tmp/work", 2, 16);
    no_reducers.add_input("input.txt");
    no_reducers.set_output(JobOutput::new("/tmp/out", 0, true));
    assert_err!(no_reducers.validate());

    let mut no_split_size = JobSpecification::new("/tmp/work", 2, 0);
    no_split_size.add_input("input.txt");
    no_split_size.set_output(JobOutput::new("/tmp/out", 1, true));
    assert_err!(no_split_size.validate());
}
