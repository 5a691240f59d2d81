use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration for one search run. Built once from user input, then shared
/// read-only by every traversal task.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of
/// precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.scour.yaml` in the current directory
/// 3. Global `$HOME/.config/scour/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Primary search pattern (supports regex)
/// pattern: "TODO|FIXME"
///
/// # Secondary filter pattern, shared by file-name and directory-name filters
/// filter_pattern: "src"
///
/// # Root directory to search in
/// root_path: "."
///
/// # Which tests to run
/// match_file_names: true
/// match_dir_names: false
/// match_content: true
///
/// # Which filters to apply
/// filter_by_file_name: false
/// filter_by_dir_name: false
///
/// # Descend into subdirectories
/// recursive: true
///
/// # Worker count (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// # CLI Integration
///
/// Command-line arguments take precedence over config file values; the
/// merging behavior is defined in [`SearchConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The primary search pattern (supports regex), applied by the
    /// name/directory/content tests
    #[serde(default)]
    pub pattern: String,

    /// The secondary filter pattern, applied by the file-name and
    /// directory-name filters
    #[serde(default)]
    pub filter_pattern: String,

    /// Root directory to start the search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Report files whose base name matches the primary pattern
    #[serde(default)]
    pub match_file_names: bool,

    /// Report directories whose name matches the primary pattern
    #[serde(default)]
    pub match_dir_names: bool,

    /// Scan file content and report matching lines
    #[serde(default)]
    pub match_content: bool,

    /// Skip content scanning for files whose base name fails the filter
    /// pattern
    #[serde(default)]
    pub filter_by_file_name: bool,

    /// Prune entire subtrees whose directory name fails the filter pattern
    #[serde(default)]
    pub filter_by_dir_name: bool,

    /// Descend into subdirectories. The root itself is always expanded one
    /// level; this flag governs everything below it.
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Number of worker threads for the traversal pool.
    /// Defaults to the number of CPU cores.
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_recursive() -> bool {
    true
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("scour/config.yaml")),
            // Local config
            Some(PathBuf::from(".scour.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.pattern.is_empty() {
            self.pattern = cli_config.pattern;
        }
        if !cli_config.filter_pattern.is_empty() {
            self.filter_pattern = cli_config.filter_pattern;
        }
        if cli_config.root_path != PathBuf::from(".") {
            self.root_path = cli_config.root_path;
        }
        // Boolean switches are additive: a switch set on the CLI turns the
        // test on, an unset switch leaves the file value alone.
        if cli_config.match_file_names {
            self.match_file_names = true;
        }
        if cli_config.match_dir_names {
            self.match_dir_names = true;
        }
        if cli_config.match_content {
            self.match_content = true;
        }
        if cli_config.filter_by_file_name {
            self.filter_by_file_name = true;
        }
        if cli_config.filter_by_dir_name {
            self.filter_by_dir_name = true;
        }
        if !cli_config.recursive {
            self.recursive = false;
        }
        // Always use CLI thread count if specified
        self.thread_count = cli_config.thread_count;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
