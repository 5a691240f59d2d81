use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::trace;

use super::matcher::PatternMatcher;
use crate::results::MatchHit;

const BUFFER_CAPACITY: usize = 8192;
const LINE_CAPACITY: usize = 256;

/// Scans one file line by line, collecting every line that matches.
///
/// Files are never held in memory whole: lines stream through a single
/// reusable buffer, and only matching lines are copied out into owned
/// [`MatchHit`]s. Line numbers are 0-based and count every line read, not
/// just the matching ones.
#[derive(Debug, Clone)]
pub struct ContentScanner {
    matcher: PatternMatcher,
}

impl ContentScanner {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self { matcher }
    }

    /// Returns the matching lines of `path`, in file order.
    ///
    /// Failure to open the file is a node-access error and yields an empty
    /// list; a failure mid-read (invalid UTF-8, the file vanishing) ends the
    /// scan with whatever was collected. Neither aborts the run.
    pub fn scan(&self, path: &Path) -> Vec<MatchHit> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                trace!("Skipping unreadable file {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut buffer = String::with_capacity(LINE_CAPACITY);
        let mut hits = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    let line = trim_line_ending(&buffer);
                    if self.matcher.is_match(line) {
                        hits.push(MatchHit {
                            line_number,
                            line: line.to_string(),
                        });
                    }
                    line_number += 1;
                }
                Err(e) => {
                    trace!("Stopping scan of {}: {}", path.display(), e);
                    break;
                }
            }
        }

        hits
    }
}

/// Strips one trailing `\n` or `\r\n`
fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
