//! src/line_reader.rs
use std::io::{self, BufRead};

/// Reads `\n`-terminated lines and drops the terminator along with a `\r`
/// right before it. Bytes that are not valid UTF-8 decode to U+FFFD instead
/// of failing the read.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// The next line and the number of bytes it occupied in the stream,
    /// terminator included. `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<(String, u64)>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        Ok(Some((String::from_utf8_lossy(line).into_owned(), read as u64)))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<(String, u64)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
