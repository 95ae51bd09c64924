//! Seed URL intake
//!
//! Seeds arrive one per line. Surrounding whitespace is trimmed and blank
//! lines are ignored. A line that is not valid UTF-8 is reported and skipped;
//! the lines after it are still read.

use crate::GossamerError;
use std::io::BufRead;

/// Seeds read from an input stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedInput {
    /// Trimmed, non-blank seed lines in input order
    pub seeds: Vec<String>,

    /// Lines dropped because they were not valid UTF-8
    pub invalid_lines: usize,
}

impl SeedInput {
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

/// Reads seed URLs from `reader` until end of input
///
/// # Returns
///
/// * `Ok(SeedInput)` - Every readable seed plus the count of skipped lines
/// * `Err(GossamerError::Io)` - The stream itself failed
pub fn read_seeds<R: BufRead>(mut reader: R) -> Result<SeedInput, GossamerError> {
    let mut input = SeedInput::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    input.seeds.push(line.to_string());
                }
            }
            Err(e) => {
                tracing::error!(
                    "Skipping input line {} ({}): {}",
                    line_no,
                    String::from_utf8_lossy(&buf).trim(),
                    e
                );
                input.invalid_lines += 1;
            }
        }
    }

    Ok(input)
}
