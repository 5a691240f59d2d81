/// Concurrent traversal-and-match engine.
///
/// The traversal is a strict fork-join tree: every directory fans out one
/// unit of work per immediate child and waits for all of them before it can
/// produce its own merged result. The original implementation of this tool
/// expressed that shape with one `std::async` future per filesystem entry,
/// which spawns unbounded concurrent work on wide directories. Here the same
/// shape runs on Rayon's work-stealing pool:
///
/// ```rust,ignore
/// let child_results: Vec<PartialResult> = children
///     .par_iter()
///     .map(|child| self.explore(child, recursive))
///     .collect();
/// ```
///
/// `collect` preserves child order, so output blocks appear in directory
/// listing order, and the pool bounds concurrency at the configured worker
/// count instead of the width of the widest directory.
///
/// Nothing is printed until the whole tree has finished: each task owns its
/// own buffer, parents merge child buffers by move, and the top level flushes
/// the fully merged text to the sink in a single atomic write. That trades
/// latency for output that can never interleave.
pub mod engine;
pub mod matcher;
pub mod scanner;
pub mod visitor;

pub use engine::{search, TraversalEngine};
pub use matcher::PatternMatcher;
pub use scanner::ContentScanner;
pub use visitor::NodeVisitor;
