pub mod config;
pub mod errors;
pub mod results;
pub mod search;
pub mod sink;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use results::{MatchHit, PartialResult};
pub use search::search;
pub use sink::{CollectingSink, ConsoleSink, ResultSink};
