/// Error types for scour.
///
/// The error taxonomy mirrors the two failure classes the engine
/// distinguishes:
///
/// 1. **Configuration errors**: a malformed pattern, an unreadable config
///    file, or a thread pool that cannot be built. These are detected once,
///    before any traversal starts, and abort the whole run. Swallowing them
///    per-node would produce misleading partial output.
///
/// 2. **Node-access errors**: a path that vanished, a permission failure, a
///    directory that cannot be listed. These are recovered locally inside the
///    traversal (the node simply contributes no matches) and never surface as
///    a `SearchError`. One bad entry must not abort the run.
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Capacity error: {0}")]
    Capacity(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_pattern("unclosed group");
        assert!(matches!(err, SearchError::InvalidPattern(_)));

        let err = SearchError::config_error("missing root path");
        assert!(matches!(err, SearchError::ConfigError(_)));

        let err = SearchError::capacity("thread pool exhausted");
        assert!(matches!(err, SearchError::Capacity(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_pattern("regex parse error: [");
        assert_eq!(err.to_string(), "Invalid pattern: regex parse error: [");

        let err = SearchError::config_error("missing required field");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing required field"
        );

        let err = SearchError::capacity("could not spawn 4096 workers");
        assert_eq!(err.to_string(), "Capacity error: could not spawn 4096 workers");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SearchError = io.into();
        assert!(matches!(err, SearchError::IoError(_)));
    }
}
