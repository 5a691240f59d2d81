use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::{SearchError, SearchResult};

const SIMPLE_PATTERN_THRESHOLD: usize = 32;

// Compiled strategies are shared across every matcher built for the same
// pattern text, so the primary and filter matchers of concurrent runs never
// recompile.
static PATTERN_CACHE: Lazy<DashMap<String, MatchStrategy>> = Lazy::new(DashMap::new);

/// Strategy for pattern matching
#[derive(Debug, Clone)]
enum MatchStrategy {
    Simple(String),
    Regex(Arc<Regex>),
}

/// A pure predicate that tests a text value against one configured pattern.
///
/// Short patterns without regex metacharacters use a fast literal substring
/// test; everything else compiles to a [`Regex`]. An empty pattern matches
/// every input, including empty text.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    strategy: MatchStrategy,
}

impl PatternMatcher {
    /// Creates a matcher for the given pattern.
    ///
    /// A malformed regex is a configuration error and fails the whole run up
    /// front; nothing is traversed with a pattern that cannot match.
    pub fn new(pattern: &str) -> SearchResult<Self> {
        if let Some(entry) = PATTERN_CACHE.get(pattern) {
            return Ok(Self {
                strategy: entry.clone(),
            });
        }

        let strategy = if Self::is_simple_pattern(pattern) {
            MatchStrategy::Simple(pattern.to_string())
        } else {
            let regex = Regex::new(pattern)
                .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
            MatchStrategy::Regex(Arc::new(regex))
        };

        PATTERN_CACHE.insert(pattern.to_string(), strategy.clone());
        Ok(Self { strategy })
    }

    /// Determines if a pattern can use simple string matching
    fn is_simple_pattern(pattern: &str) -> bool {
        pattern.len() < SIMPLE_PATTERN_THRESHOLD
            && !pattern.contains(['*', '+', '?', '[', ']', '(', ')', '{', '}', '|', '^', '$', '.', '\\'])
    }

    /// Tests whether the text contains a match
    pub fn is_match(&self, text: &str) -> bool {
        match &self.strategy {
            MatchStrategy::Simple(pattern) => text.contains(pattern.as_str()),
            MatchStrategy::Regex(regex) => regex.is_match(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_pattern_matching() {
        let matcher = PatternMatcher::new("test").unwrap();
        assert!(matcher.is_match("this is a test string"));
        assert!(matcher.is_match("test"));
        assert!(!matcher.is_match("nothing here"));
    }

    #[test]
    fn test_regex_pattern_matching() {
        let matcher = PatternMatcher::new(r"\btest\w+").unwrap();
        assert!(matcher.is_match("testing"));
        assert!(!matcher.is_match("test"));
        assert!(!matcher.is_match("contest"));
    }

    #[test]
    fn test_empty_pattern_matches_trivially() {
        // Pinned behavior: an empty pattern matches everything, even empty
        // text.
        let matcher = PatternMatcher::new("").unwrap();
        assert!(matcher.is_match(""));
        assert!(matcher.is_match("anything"));
    }

    #[test]
    fn test_empty_text() {
        let matcher = PatternMatcher::new("test").unwrap();
        assert!(!matcher.is_match(""));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let result = PatternMatcher::new("[unclosed");
        assert!(matches!(
            result,
            Err(crate::errors::SearchError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_is_simple_pattern() {
        assert!(PatternMatcher::is_simple_pattern("test"));
        assert!(PatternMatcher::is_simple_pattern("hello_world"));
        assert!(!PatternMatcher::is_simple_pattern(r"\btest\w+"));
        assert!(!PatternMatcher::is_simple_pattern("test.*pattern"));
    }

    #[test]
    fn test_pattern_cache_reuse() {
        // Two matchers over the same pattern share one cached strategy; both
        // must behave identically.
        let first = PatternMatcher::new("cache_reuse_probe").unwrap();
        let second = PatternMatcher::new("cache_reuse_probe").unwrap();
        assert!(first.is_match("a cache_reuse_probe b"));
        assert!(second.is_match("a cache_reuse_probe b"));
    }
}
