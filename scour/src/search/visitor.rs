use std::borrow::Cow;
use std::path::Path;

use super::matcher::PatternMatcher;
use super::scanner::ContentScanner;
use crate::config::SearchConfig;
use crate::errors::SearchResult;
use crate::results::PartialResult;

/// Applies the configured tests to a single filesystem node and formats the
/// resulting output blocks.
///
/// The visitor owns compiled matchers for the primary pattern and the
/// secondary filter pattern; constructing it validates both, so a malformed
/// pattern aborts the run before any node is visited.
#[derive(Debug)]
pub struct NodeVisitor<'a> {
    config: &'a SearchConfig,
    pattern: PatternMatcher,
    filter: PatternMatcher,
    scanner: ContentScanner,
}

impl<'a> NodeVisitor<'a> {
    pub fn new(config: &'a SearchConfig) -> SearchResult<Self> {
        let pattern = PatternMatcher::new(&config.pattern)?;
        let filter = PatternMatcher::new(&config.filter_pattern)?;
        let scanner = ContentScanner::new(pattern.clone());
        Ok(Self {
            config,
            pattern,
            filter,
            scanner,
        })
    }

    /// Runs the file tests against `path`.
    ///
    /// Order matters and is part of the output contract: the directory-name
    /// filter can skip the file outright; a file-name match emits a path-only
    /// block; the file-name filter can then veto content scanning while any
    /// name block already emitted stands; finally a content scan with at
    /// least one hit emits the path line plus one `line <n> : <text>` line
    /// per hit, as a single block.
    pub fn visit_file(&self, path: &Path) -> PartialResult {
        let mut result = PartialResult::new();

        if self.config.filter_by_dir_name && !self.filter.is_match(&parent_name(path)) {
            return result;
        }

        let name = base_name(path);
        if self.config.match_file_names && self.pattern.is_match(&name) {
            result.push_block(format!("{}\r\n", output_path(path)));
        }

        if self.config.filter_by_file_name && !self.filter.is_match(&name) {
            return result;
        }

        if self.config.match_content {
            let hits = self.scanner.scan(path);
            if !hits.is_empty() {
                let mut block = format!("{}\r\n", output_path(path));
                for hit in &hits {
                    block.push_str(&format!("line {} : {}\r\n", hit.line_number, hit.line));
                }
                result.push_block(block);
            }
        }

        result
    }

    /// Runs the directory tests against `path` and decides whether the
    /// traversal should descend into it.
    ///
    /// The name-match block is emitted before the filter is evaluated: a
    /// directory that matches the primary pattern but fails the filter still
    /// prints its own path, only its subtree is pruned.
    pub fn visit_directory(&self, path: &Path) -> (PartialResult, bool) {
        let mut result = PartialResult::new();
        let name = base_name(path);

        if self.config.match_dir_names && self.pattern.is_match(&name) {
            result.push_block(format!("{}\r\n", output_path(path)));
        }

        let descend = !self.config.filter_by_dir_name || self.filter.is_match(&name);
        (result, descend)
    }
}

/// Renders a path for output: `\` as separator on every platform.
pub(crate) fn output_path(path: &Path) -> String {
    path.display().to_string().replace('/', "\\")
}

fn base_name(path: &Path) -> Cow<'_, str> {
    path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
}

fn parent_name(path: &Path) -> Cow<'_, str> {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
}
