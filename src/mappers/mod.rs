//! src/mappers/mod.rs
mod filtered_tokenizer;
pub use filtered_tokenizer::FilteredTokenizer;
