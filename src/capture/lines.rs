//! Line-by-line reading of a child's output.

use std::io::{self, BufRead};

/// Iterator over the lines of a byte stream.
///
/// Each line is decoded lossily as UTF-8 and trimmed. The iterator is
/// finite exactly when the underlying reader reaches end-of-stream; a read
/// error is yielded once and ends the iteration.
pub struct LineStream<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> LineStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineStream<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(String::from_utf8_lossy(&self.buf).trim().to_string())),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
