//! Logical line splitting with backslash continuation.

use std::io::{self, BufRead};

use log::warn;

/// Marker that joins a line with the next one when it ends the line.
const CONTINUATION: char = '\\';

/// Iterator over the logical lines of a reader.
///
/// A physical line ending in a backslash is joined with the following line;
/// the backslash itself is dropped. Joins can chain over any number of
/// lines. Both `\n` and `\r\n` endings are accepted.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD and the line is
/// kept. The iterator stops after yielding the first read error.
///
/// # Example
///
/// ```rust
/// use depgrapher::ingest::ContinuedLines;
///
/// let input = "all: a \\\n  b \\\n  c\nclean:\n";
/// let lines: Vec<String> = ContinuedLines::new(input.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(lines, vec!["all: a   b   c", "clean:"]);
/// ```
#[derive(Debug)]
pub struct ContinuedLines<R> {
    reader: R,
    finished: bool,
}

impl<R: BufRead> ContinuedLines<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for ContinuedLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut logical = String::new();
        let mut continued = false;
        loop {
            let mut bytes = Vec::new();
            match self.reader.read_until(b'\n', &mut bytes) {
                Ok(0) => {
                    self.finished = true;
                    // a trailing backslash at end of input still ends a line
                    return continued.then_some(Ok(logical));
                }
                Ok(_) => {}
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }

            if bytes.ends_with(b"\n") {
                bytes.pop();
                if bytes.ends_with(b"\r") {
                    bytes.pop();
                }
            }

            let physical = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    warn!("Replacing invalid UTF-8 in input line");
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                }
            };

            match physical.strip_suffix(CONTINUATION) {
                Some(head) => {
                    logical.push_str(head);
                    continued = true;
                }
                None => {
                    logical.push_str(&physical);
                    return Some(Ok(logical));
                }
            }
        }
    }
}
