//! src/mappers/filtered_tokenizer.rs
use crate::cache::StagedFiles;
use crate::error::PipelineError;
use crate::filter_set::{FilterSet, FilterSetLoader, split_tokens};
use crate::functions::{CountRecord, MapEmitter, MapInput, Mapper};
use std::sync::Arc;

/// Emits `(token, 1)` for every space-separated token of a record that is a
/// member of the worker's filter set. Tokens are looked up exactly as they
/// appear in the record.
#[derive(Clone, Debug)]
pub struct FilteredTokenizer {
    filter_set: Arc<FilterSet>,
}

impl FilteredTokenizer {
    pub fn new(filter_set: Arc<FilterSet>) -> Self {
        Self { filter_set }
    }

    /// Builds the worker's filter set from whatever was staged for it. Runs
    /// once per worker, before the first record.
    #[tracing::instrument(name = "Set up filtered tokenizer", skip_all)]
    pub fn setup<S: StagedFiles + ?Sized>(staged: &S) -> (Self, usize) {
        let paths = staged.local_cache_files();
        if paths.is_empty() {
            tracing::warn!("No filter files staged, nothing will be counted");
        }
        let (filter_set, warnings) = FilterSetLoader::load(paths).into_parts();
        if filter_set.is_empty() {
            tracing::warn!(
                warnings = warnings.len(),
                "Filter set is empty, nothing will be counted"
            );
        } else {
            tracing::info!(tokens = filter_set.len(), "Filter set ready");
        }
        (Self::new(Arc::new(filter_set)), warnings.len())
    }

    pub fn filter_set(&self) -> &FilterSet {
        &self.filter_set
    }
}

impl Mapper for FilteredTokenizer {
    fn map<E: MapEmitter>(&self, input: &MapInput, emitter: &mut E) -> Result<(), PipelineError> {
        for token in split_tokens(input.value()) {
            if self.filter_set.contains(token) {
                emitter.emit(CountRecord::unit(token))?;
            }
        }
        Ok(())
    }
}
