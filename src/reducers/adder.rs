//! src/reducers/adder.rs
use crate::combiner::merge_counts;
use crate::error::PipelineError;
use crate::functions::{CountRecord, ReduceEmitter, ReduceInput, Reducer};

/// Sums every partial count of a token into its final total.
#[derive(Debug, Default, Clone, Copy)]
pub struct Adder;

impl Reducer for Adder {
    fn reduce<I, E>(&self, input: ReduceInput<I>, emitter: &mut E) -> Result<(), PipelineError>
    where
        I: Iterator<Item = u64>,
        E: ReduceEmitter,
    {
        let (key, values) = input.into_parts();
        let mut total = 0;
        for value in values {
            total = merge_counts(total, value).map_err(|e| e.for_key(&key))?;
        }
        emitter.emit(CountRecord::new(key, total))
    }
}
