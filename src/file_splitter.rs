//! src/file_splitter.rs
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Cuts one input file into line-aligned split files of at most
/// `split_size_in_bytes`. A single line longer than that gets a split of its own.
pub struct FileSplitter {
    split_size_in_bytes: u64,
    path: PathBuf,
    out_path: PathBuf,
    out_file_name: String,
}

impl FileSplitter {
    pub fn new(
        path: PathBuf,
        split_size_in_bytes: u64,
        out_file_name: String,
        out_path: PathBuf,
    ) -> Self {
        FileSplitter {
            split_size_in_bytes,
            path,
            out_file_name,
            out_path,
        }
    }

    pub fn split(&self) -> Result<Vec<PathBuf>, anyhow::Error> {
        if !self.path.is_file() {
            return Err(anyhow::anyhow!(
                "Input file doesn't exist: {}",
                self.path.display()
            ));
        }

        let in_file = File::open(&self.path).context("Failed to open input file")?;
        let mut reader = BufReader::new(in_file);
        let mut results: Vec<PathBuf> = Vec::new();
        let mut current: Option<BufWriter<File>> = None;
        let mut current_size = 0u64;
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .context(format!("Failed to read {}", self.path.display()))?;
            if read == 0 {
                break;
            }
            if line.last() != Some(&b'\n') {
                line.push(b'\n');
            }
            let line_size = line.len() as u64;

            if current.is_some() && current_size + line_size > self.split_size_in_bytes {
                if let Some(mut writer) = current.take() {
                    writer.flush().context("Failed to flush split file")?;
                }
            }
            let writer = match current.take() {
                Some(writer) => writer,
                None => {
                    let (file, path) = self.create_new_out_file(&results.len().to_string())?;
                    results.push(path);
                    current_size = 0;
                    BufWriter::new(file)
                }
            };
            let writer = current.insert(writer);
            writer
                .write_all(&line)
                .context("Failed to write line to out file")?;
            current_size += line_size;
        }

        if let Some(mut writer) = current {
            writer.flush().context("Failed to flush split file")?;
        }
        Ok(results)
    }

    fn create_new_out_file(&self, suffix: &str) -> Result<(File, PathBuf), anyhow::Error> {
        let name = format!("{}_{suffix}", self.out_file_name);
        let mut path = PathBuf::from(&self.out_path);
        path.push(name);
        let file = File::create(&path)
            .context(format!("Failed to create file at: {}", path.display()))?;
        Ok((file, path))
    }
}
