use clap::Parser;
use scour::{search, ConsoleSink, SearchConfig, SearchError};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

/// Concurrent, recursive filesystem search
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root directory to search in
    #[arg(short = 'd', long, default_value = ".")]
    root: PathBuf,

    /// Primary search pattern (supports regex)
    #[arg(short = 'p', long, default_value = "")]
    pattern: String,

    /// Secondary filter pattern, shared by the file-name and directory-name
    /// filters
    #[arg(short = 'f', long = "filter", default_value = "")]
    filter: String,

    /// Report files whose name matches the pattern
    #[arg(short = 'n', long = "names")]
    match_names: bool,

    /// Report directories whose name matches the pattern
    #[arg(short = 'D', long = "dirs")]
    match_dirs: bool,

    /// Scan file content and report matching lines
    #[arg(short = 'c', long = "content")]
    match_content: bool,

    /// Skip content scanning for files whose name fails the filter pattern
    #[arg(long = "filter-names")]
    filter_names: bool,

    /// Prune subtrees whose directory name fails the filter pattern
    #[arg(long = "filter-dirs")]
    filter_dirs: bool,

    /// Do not descend below the root's immediate children
    #[arg(long = "no-recurse")]
    no_recurse: bool,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cli_config = SearchConfig {
        pattern: cli.pattern,
        filter_pattern: cli.filter,
        root_path: cli.root,
        match_file_names: cli.match_names,
        match_dir_names: cli.match_dirs,
        match_content: cli.match_content,
        filter_by_file_name: cli.filter_names,
        filter_by_dir_name: cli.filter_dirs,
        recursive: !cli.no_recurse,
        thread_count: cli
            .threads
            .unwrap_or_else(|| NonZeroUsize::new(num_threads_default()).unwrap()),
        log_level: cli.log_level,
    };

    // Config file values are the base; CLI values win. A file that exists
    // but will not parse is a configuration error and aborts the run.
    let config = SearchConfig::load_from(cli.config.as_deref())
        .map_err(|e| SearchError::config_error(e.to_string()))?
        .merge_with_cli(cli_config);

    init_logging(&config.log_level);

    search(&config, &ConsoleSink::new())
}

fn num_threads_default() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
