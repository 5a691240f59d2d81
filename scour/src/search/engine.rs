use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use super::visitor::NodeVisitor;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::results::PartialResult;
use crate::sink::ResultSink;

/// What the filesystem says a path is, reduced to the cases the traversal
/// cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    File,
    Directory,
    /// Symlinks, devices, sockets. Deliberately not classified further;
    /// they contribute nothing to the output.
    Other,
    Inaccessible,
}

fn classify(path: &Path) -> NodeKind {
    match fs::symlink_metadata(path) {
        Ok(meta) => {
            let file_type = meta.file_type();
            if file_type.is_file() {
                NodeKind::File
            } else if file_type.is_dir() {
                NodeKind::Directory
            } else {
                NodeKind::Other
            }
        }
        Err(_) => NodeKind::Inaccessible,
    }
}

/// Lists the immediate children of a directory in listing order. A directory
/// that cannot be listed has zero children; that is a node-access condition,
/// not an error.
fn list_children(path: &Path) -> Vec<PathBuf> {
    match fs::read_dir(path) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect(),
        Err(e) => {
            trace!("Cannot list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Recursive fork-join traversal over a directory tree.
///
/// Every directory fans out one unit of work per child and joins them all
/// before producing its own merged result, so a subtree's output is complete
/// and ordered (directory checks first, then children in listing order)
/// before it moves up the tree. The fan-out runs on a bounded work-stealing
/// pool rather than one OS-level task per entry, which keeps pathologically
/// wide directories from exhausting the process.
#[derive(Debug)]
pub struct TraversalEngine<'a> {
    config: &'a SearchConfig,
    visitor: NodeVisitor<'a>,
}

impl<'a> TraversalEngine<'a> {
    /// Builds the engine, validating both patterns up front.
    pub fn new(config: &'a SearchConfig) -> SearchResult<Self> {
        Ok(Self {
            config,
            visitor: NodeVisitor::new(config)?,
        })
    }

    /// Explores one node and returns everything its subtree decided to
    /// print.
    ///
    /// `recursive` governs whether a directory is expanded here; children of
    /// an expanded directory are explored with the configured flag. The top
    /// level passes `true` unconditionally, so the root is always expanded
    /// one level even when recursion is off.
    pub fn explore(&self, path: &Path, recursive: bool) -> PartialResult {
        match classify(path) {
            NodeKind::File => self.visitor.visit_file(path),
            NodeKind::Directory => {
                let (mut result, descend) = self.visitor.visit_directory(path);
                if recursive && descend {
                    let children = list_children(path);
                    let child_results: Vec<PartialResult> = children
                        .par_iter()
                        .map(|child| self.explore(child, self.config.recursive))
                        .collect();
                    for child_result in child_results {
                        result.merge(child_result);
                    }
                }
                result
            }
            NodeKind::Other | NodeKind::Inaccessible => PartialResult::new(),
        }
    }
}

/// Runs a complete search: validates configuration, traverses the tree on a
/// bounded pool, and flushes the merged output to the sink in exactly one
/// atomic write once the whole tree has finished.
pub fn search(config: &SearchConfig, sink: &dyn ResultSink) -> SearchResult<()> {
    info!(
        "Starting search for {:?} under {}",
        config.pattern,
        config.root_path.display()
    );

    let engine = TraversalEngine::new(config)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_count.get())
        .build()
        .map_err(|e| SearchError::capacity(e.to_string()))?;

    let result = pool.install(|| engine.explore(&config.root_path, true));
    debug!("Traversal finished with {} output blocks", result.len());

    sink.write(&result.render())?;

    info!("Search complete, {} blocks written", result.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::visitor::output_path;
    use crate::sink::CollectingSink;
    use std::num::NonZeroUsize;

    use tempfile::tempdir;

    fn test_config(root: &Path) -> SearchConfig {
        SearchConfig {
            pattern: String::new(),
            filter_pattern: String::new(),
            root_path: root.to_path_buf(),
            match_file_names: false,
            match_dir_names: false,
            match_content: false,
            filter_by_file_name: false,
            filter_by_dir_name: false,
            recursive: true,
            thread_count: NonZeroUsize::new(4).unwrap(),
            log_level: "warn".to_string(),
        }
    }

    /// Builds `root/a.txt` ("foo\nbar") and `root/sub/b.txt` ("foo") under a
    /// tempdir and returns the tempdir plus the root path.
    fn two_level_tree() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "foo\nbar").unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub").join("b.txt"), "foo").unwrap();
        (dir, root)
    }

    #[test]
    fn test_content_search_reports_both_files() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = "foo".to_string();
        config.match_content = true;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        // One flush for the whole run.
        let blocks = sink.blocks();
        assert_eq!(blocks.len(), 1);

        let text = &blocks[0];
        let a_block = format!("{}\r\nline 0 : foo\r\n", output_path(&root.join("a.txt")));
        let b_block = format!(
            "{}\r\nline 0 : foo\r\n",
            output_path(&root.join("sub").join("b.txt"))
        );
        assert!(text.contains(&a_block), "missing a.txt block in {text:?}");
        assert!(text.contains(&b_block), "missing b.txt block in {text:?}");
    }

    #[test]
    fn test_name_match_appears_exactly_once() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = "b.txt".to_string();
        config.match_file_names = true;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        let text = sink.text();
        let expected = format!("{}\r\n", output_path(&root.join("sub").join("b.txt")));
        assert_eq!(text.matches(&expected).count(), 1);
    }

    #[test]
    fn test_directory_filter_prunes_whole_subtree() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = "foo".to_string();
        // "root" passes the filter, "sub" fails it: everything under sub is
        // invisible even though b.txt's content matches.
        config.filter_pattern = "root".to_string();
        config.match_content = true;
        config.filter_by_dir_name = true;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        let text = sink.text();
        assert!(text.contains("a.txt"));
        assert!(!text.contains("b.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_silent_and_siblings_survive() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, root) = two_level_tree();
        let locked = root.join("locked.txt");
        std::fs::write(&locked, "foo\n").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Under root the chmod has no effect; only assert absence when the
        // open actually fails.
        let open_fails = std::fs::File::open(&locked).is_err();

        let mut config = test_config(&root);
        config.pattern = "foo".to_string();
        config.match_content = true;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        let text = sink.text();
        assert!(text.contains("a.txt"));
        assert!(text.contains("b.txt"));
        if open_fails {
            assert!(!text.contains("locked.txt"));
        }
    }

    #[test]
    fn test_nonexistent_root_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut config = test_config(&dir.path().join("missing"));
        config.pattern = "foo".to_string();
        config.match_content = true;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        assert_eq!(sink.text(), "");
    }

    #[test]
    fn test_non_recursive_still_expands_root_one_level() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = ".txt".to_string();
        config.match_file_names = true;
        config.recursive = false;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        let text = sink.text();
        // Files directly under the root are tested; nothing below sub is.
        assert!(text.contains("a.txt"));
        assert!(!text.contains("b.txt"));
    }

    #[test]
    fn test_non_recursive_subdirectory_still_name_checked() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = "sub".to_string();
        config.match_dir_names = true;
        config.recursive = false;

        let sink = CollectingSink::new();
        search(&config, &sink).unwrap();

        let expected = format!("{}\r\n", output_path(&root.join("sub")));
        assert_eq!(sink.text(), expected);
    }

    #[test]
    fn test_invalid_pattern_aborts_before_traversal() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = "[unclosed".to_string();
        config.match_content = true;

        let sink = CollectingSink::new();
        let result = search(&config, &sink);

        assert!(matches!(result, Err(SearchError::InvalidPattern(_))));
        assert!(sink.blocks().is_empty());
    }

    #[test]
    fn test_idempotent_over_unchanged_tree() {
        let (_dir, root) = two_level_tree();
        let mut config = test_config(&root);
        config.pattern = "foo".to_string();
        config.match_content = true;

        let first = CollectingSink::new();
        search(&config, &first).unwrap();
        let second = CollectingSink::new();
        search(&config, &second).unwrap();

        let mut a: Vec<String> = first.text().split("\r\n").map(String::from).collect();
        let mut b: Vec<String> = second.text().split("\r\n").map(String::from).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
