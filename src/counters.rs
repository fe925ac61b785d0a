//! src/counters.rs

/// Per-worker tallies, summed by the master once a phase completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounters {
    pub map_input_records: u64,
    pub map_output_records: u64,
    pub combine_input_records: u64,
    pub combine_output_records: u64,
    pub reduce_input_groups: u64,
    pub reduce_output_records: u64,
    pub filter_load_warnings: u64,
}

impl TaskCounters {
    pub fn merge(&mut self, other: &TaskCounters) {
        self.map_input_records += other.map_input_records;
        self.map_output_records += other.map_output_records;
        self.combine_input_records += other.combine_input_records;
        self.combine_output_records += other.combine_output_records;
        self.reduce_input_groups += other.reduce_input_groups;
        self.reduce_output_records += other.reduce_output_records;
        self.filter_load_warnings += other.filter_load_warnings;
    }
}
