//! src/lib.rs
pub mod cache;
pub mod combiner;
pub mod configuration;
pub mod counters;
pub mod emitter;
pub mod error;
pub mod file_splitter;
pub mod filter_set;
pub mod functions;
pub mod job;
pub mod line_reader;
pub mod mappers;
pub mod mapreduce;
pub mod master;
pub mod output;
pub mod reducers;
pub mod shuffle;
pub mod spec;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod worker;
