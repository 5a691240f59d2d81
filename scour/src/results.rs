//! Result types for the traversal.
//!
//! A [`PartialResult`] is the accumulated, not-yet-flushed output owned by a
//! single traversal task. Ownership is the concurrency story here: a buffer
//! is exclusively owned by the task that produced it until it is moved into
//! the parent's buffer by [`PartialResult::merge`]. No buffer is ever shared
//! between two live tasks, so none of them needs a lock.

/// A single matching line found by the content scanner.
///
/// Line numbers are 0-based: the counter starts at zero and is incremented
/// after every line read, whether or not the line matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHit {
    /// 0-based line number where the match was found
    pub line_number: usize,
    /// The content of the matching line, without its line terminator
    pub line: String,
}

/// An ordered, append-only sequence of output blocks produced by one subtree.
///
/// Each block is the complete text for one reported path (a path line, plus
/// hit lines for a content match) and is flushed contiguously. Blocks appear
/// in the order the decisions were made for the subtree: the directory's own
/// checks first, then each child's output in child-launch order.
#[derive(Debug, Clone, Default)]
pub struct PartialResult {
    blocks: Vec<String>,
}

impl PartialResult {
    /// Creates a new empty result
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends one complete output block
    pub fn push_block(&mut self, block: String) {
        self.blocks.push(block);
    }

    /// Merges a child's result into this one, consuming it.
    ///
    /// The child buffer is moved, never mutated in place: once handed to the
    /// parent, the producer cannot touch it again.
    pub fn merge(&mut self, child: PartialResult) {
        self.blocks.extend(child.blocks);
    }

    /// Whether any block has been emitted
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of emitted blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// The emitted blocks, in emission order
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Renders the full accumulated text, blocks concatenated in order
    pub fn render(&self) -> String {
        self.blocks.concat()
    }
}
