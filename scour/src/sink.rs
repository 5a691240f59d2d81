//! Output sinks.
//!
//! The traversal never writes to the console directly; everything goes
//! through a [`ResultSink`], the one piece of shared mutable state in the
//! whole engine. A sink promises that a single `write` call is atomic: no
//! other writer's text appears inside the block. It promises nothing about
//! ordering across independent `write` calls from concurrent callers.

use std::io::{self, Write};
use std::sync::Mutex;

/// A thread-safe, append-only text sink.
pub trait ResultSink: Send + Sync {
    /// Atomically appends one block of text.
    fn write(&self, block: &str) -> io::Result<()>;
}

/// Sink backed by the process's standard output.
///
/// Holds the stdout lock for the duration of one block and flushes before
/// releasing it, so a block is visible as a contiguous unit.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ResultSink for ConsoleSink {
    fn write(&self, block: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(block.as_bytes())?;
        stdout.flush()
    }
}

/// In-memory sink that records every block it receives.
///
/// Used by tests and embedders that want the output as data instead of
/// console text.
#[derive(Debug, Default)]
pub struct CollectingSink {
    blocks: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Default::default()
    }

    /// The blocks written so far, in arrival order
    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().expect("sink lock poisoned").clone()
    }

    /// The full collected text
    pub fn text(&self) -> String {
        self.blocks().concat()
    }
}

impl ResultSink for CollectingSink {
    fn write(&self, block: &str) -> io::Result<()> {
        self.blocks
            .lock()
            .expect("sink lock poisoned")
            .push(block.to_string());
        Ok(())
    }
}
