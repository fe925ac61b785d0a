//! src/filter_set.rs
//!
//! The vocabulary a worker counts. Filter files are plain text, tokens are
//! separated by single spaces, and every token is lowercased on load. Input
//! tokens are compared verbatim, so a token carrying any uppercase letter can
//! never match.
use crate::error::error_chain_fmt;
use crate::line_reader::LineReader;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Splits a line on the literal space character. Empty pieces left by leading
/// or repeated spaces are tokens too; trailing ones are dropped. An empty line
/// is a single empty token, a line of nothing but spaces has none. Tabs and
/// other whitespace stay part of the token.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    let trimmed = line.trim_end_matches(' ');
    let has_tokens = line.is_empty() || !trimmed.is_empty();
    has_tokens.then(|| trimmed.split(' ')).into_iter().flatten()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterSet {
    tokens: HashSet<String>,
}

impl FilterSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn insert_line(&mut self, line: &str) {
        for token in split_tokens(line) {
            self.tokens.insert(token.to_lowercase());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for FilterSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut filter_set = FilterSet::empty();
        for line in iter {
            filter_set.insert_line(line.as_ref());
        }
        filter_set
    }
}

#[derive(thiserror::Error)]
#[error("Failed to read filter file {}", path.display())]
pub struct FilterLoadWarning {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

impl FilterLoadWarning {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for FilterLoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

/// Result of a best-effort load: whatever could be read, plus what could not.
#[derive(Debug, Default)]
pub struct FilterLoad {
    filter_set: FilterSet,
    warnings: Vec<FilterLoadWarning>,
}

impl FilterLoad {
    pub fn filter_set(&self) -> &FilterSet {
        &self.filter_set
    }

    pub fn warnings(&self) -> &[FilterLoadWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (FilterSet, Vec<FilterLoadWarning>) {
        (self.filter_set, self.warnings)
    }
}

pub struct FilterSetLoader;

impl FilterSetLoader {
    /// Reads every path in order. A path that fails is recorded as a warning
    /// and skipped; tokens read from it before the failure are kept.
    #[tracing::instrument(name = "Load filter set", skip_all)]
    pub fn load<I, P>(paths: I) -> FilterLoad
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut load = FilterLoad::default();
        for path in paths {
            let path = path.as_ref();
            if let Err(source) = Self::scan_file(path, &mut load.filter_set) {
                let warning = FilterLoadWarning {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = ?warning, "Skipping unreadable filter file");
                load.warnings.push(warning);
            }
        }
        tracing::debug!(
            tokens = load.filter_set.len(),
            warnings = load.warnings.len(),
            "Filter set loaded"
        );
        load
    }

    fn scan_file(path: &Path, filter_set: &mut FilterSet) -> std::io::Result<()> {
        let mut lines = LineReader::new(BufReader::new(File::open(path)?));
        while let Some((line, _)) = lines.next_line()? {
            filter_set.insert_line(&line);
        }
        Ok(())
    }
}
