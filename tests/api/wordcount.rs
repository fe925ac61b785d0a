//! tests/api/wordcount.rs
use crate::helpers::{TestJob, counts, test_data_dir};
use claims::assert_err;
use filtered_wordcount::output::SUCCESS_MARKER;

#[tokio::test]
async fn should_count_only_words_from_the_filter_file() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["the cat sat", "dog cat dog"]);
    job.add_input(input);
    job.write_filter("filter.txt", "cat dog");

    let report = job.run().await.expect("Job failed");

    assert_eq!(job.totals(), counts(&[("cat", 2), ("dog", 2)]));
    assert!(job.output_dir().join(SUCCESS_MARKER).is_file());
    assert_eq!(report.counters.map_input_records, 2);
    assert_eq!(report.counters.map_output_records, 4);
    assert_eq!(report.counters.reduce_output_records, 2);
}

// Filter entries are lowercased on load while corpus tokens are compared
// verbatim, so "Cat" in the corpus is never counted.
#[tokio::test]
async fn uppercase_corpus_tokens_should_not_match_a_lowercased_filter() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["Cat cat"]);
    job.add_input(input);
    job.write_filter("filter.txt", "Cat");

    job.run().await.expect("Job failed");

    assert_eq!(job.totals(), counts(&[("cat", 1)]));
}

#[tokio::test]
async fn without_a_filter_file_the_output_should_be_empty() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["cat dog"]);
    job.add_input(input);

    let report = job.run().await.expect("Job failed");

    assert!(job.totals().is_empty());
    assert!(job.output_dir().join(SUCCESS_MARKER).is_file());
    assert_eq!(report.counters.map_output_records, 0);
}

#[tokio::test]
async fn an_empty_filter_file_should_produce_empty_output() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["cat dog"]);
    job.add_input(input);
    job.write_filter("filter.txt", "");

    job.run().await.expect("Job failed");

    assert!(job.totals().is_empty());
}

#[tokio::test]
async fn duplicate_filter_entries_should_not_change_counts() {
    let mut deduped = TestJob::new();
    let mut duplicated = TestJob::new();
    for job in [&mut deduped, &mut duplicated] {
        job.add_input(test_data_dir().join("corpus.txt"));
    }
    deduped.write_filter("filter.txt", "cat dog");
    duplicated.write_filter("filter.txt", "cat cat\ndog cat");

    deduped.run().await.expect("Job failed");
    duplicated.run().await.expect("Job failed");

    assert_eq!(deduped.totals(), duplicated.totals());
}

#[tokio::test]
async fn one_unreadable_filter_file_should_not_fail_the_job() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["the cat sat", "dog cat dog"]);
    job.add_input(input);
    job.add_filter(job.root.join("does-not-exist.txt"));
    job.write_filter("filter.txt", "cat");

    job.run().await.expect("Job failed");

    assert_eq!(job.totals(), counts(&[("cat", 2)]));
}

#[tokio::test]
async fn the_sample_corpus_should_produce_the_expected_totals() {
    let mut job = TestJob::new();
    job.add_input(test_data_dir().join("corpus.txt"));
    job.add_filter(test_data_dir().join("filter.txt"));

    job.run().await.expect("Job failed");

    assert_eq!(
        job.totals(),
        counts(&[("bird", 4), ("cat", 5), ("dog", 5)])
    );
}

#[tokio::test]
async fn combining_should_not_change_the_output() {
    let mut combined = TestJob::new();
    let mut plain = TestJob::new();
    plain.combine = false;
    for job in [&mut combined, &mut plain] {
        job.add_input(test_data_dir().join("corpus.txt"));
        job.add_filter(test_data_dir().join("filter.txt"));
    }

    let combined_report = combined.run().await.expect("Job failed");
    let plain_report = plain.run().await.expect("Job failed");

    assert_eq!(combined.totals(), plain.totals());
    assert_eq!(plain_report.counters.combine_output_records, 0);
    assert!(
        combined_report.counters.combine_output_records
            < combined_report.counters.combine_input_records
    );
}

#[tokio::test]
async fn cluster_shape_should_not_change_the_output() {
    let mut reference = TestJob::new();
    reference.workers = 1;
    reference.reduce_tasks = 1;
    reference.split_size_in_bytes = 1024 * 1024;
    reference.add_input(test_data_dir().join("corpus.txt"));
    reference.add_filter(test_data_dir().join("filter.txt"));
    reference.run().await.expect("Job failed");

    for (workers, reduce_tasks, split_size_in_bytes) in [(3, 4, 40), (8, 1, 10), (2, 7, 200)] {
        let mut job = TestJob::new();
        job.workers = workers;
        job.reduce_tasks = reduce_tasks;
        job.split_size_in_bytes = split_size_in_bytes;
        job.add_input(test_data_dir().join("corpus.txt"));
        job.add_filter(test_data_dir().join("filter.txt"));

        job.run().await.expect("Job failed");

        assert_eq!(job.totals(), reference.totals());
    }
}

#[tokio::test]
async fn every_reduce_task_should_write_a_part_file() {
    let mut job = TestJob::new();
    job.reduce_tasks = 3;
    job.add_input(test_data_dir().join("corpus.txt"));
    job.add_filter(test_data_dir().join("filter.txt"));

    job.run().await.expect("Job failed");

    for partition in 0..3 {
        let part = job.output_dir().join(format!("part-r-{:05}", partition));
        assert!(part.is_file(), "missing {}", part.display());
    }
}

#[tokio::test]
async fn an_input_directory_should_be_read_file_by_file() {
    let mut job = TestJob::new();
    job.write_input("a.txt", &["cat cat"]);
    job.write_input("b.txt", &["dog", "cat"]);
    job.add_input(job.root.join("input"));
    job.write_filter("filter.txt", "cat dog");

    job.run().await.expect("Job failed");

    assert_eq!(job.totals(), counts(&[("cat", 3), ("dog", 1)]));
}

#[tokio::test]
async fn a_missing_input_should_fail_the_job() {
    let mut job = TestJob::new();
    job.add_input(job.root.join("nowhere.txt"));
    job.write_filter("filter.txt", "cat");

    assert_err!(job.run().await);
    assert!(!job.output_dir().exists());
}

#[tokio::test]
async fn an_existing_output_directory_should_fail_the_job() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["cat"]);
    job.add_input(input);
    job.write_filter("filter.txt", "cat");
    std::fs::create_dir_all(job.output_dir()).unwrap();

    assert_err!(job.run().await);
    assert!(!job.output_dir().join(SUCCESS_MARKER).exists());
}

#[tokio::test]
async fn intermediate_data_should_be_removed_after_success() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["cat"]);
    job.add_input(input);
    job.write_filter("filter.txt", "cat");

    let report = job.run().await.expect("Job failed");

    assert!(!job.work_dir().join(report.job_id.to_string()).exists());
}

#[tokio::test]
async fn blank_filter_lines_should_count_empty_tokens() {
    let mut job = TestJob::new();
    let input = job.write_input("corpus.txt", &["cat  dog", "", " cat"]);
    job.add_input(input);
    job.write_filter("filter.txt", "cat dog\n\n");

    job.run().await.expect("Job failed");

    assert_eq!(job.totals(), counts(&[("", 3), ("cat", 2), ("dog", 1)]));
}

#[tokio::test]
async fn an_undecodable_record_should_not_fail_the_job() {
    let mut job = TestJob::new();
    let input = job.root.join("corpus.txt");
    std::fs::write(&input, b"cat dog\ncat \xff\ncat\n").unwrap();
    job.add_input(input);
    job.write_filter("filter.txt", "cat dog");

    job.run().await.expect("Job failed");

    assert_eq!(job.totals(), counts(&[("cat", 3), ("dog", 1)]));
}
