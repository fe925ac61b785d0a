//! tests/api/main.rs
mod helpers;
mod spec;
mod wordcount;
