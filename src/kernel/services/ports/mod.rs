//! Service ports: traits + data contracts.

pub mod config;
pub mod search;

pub use config::PipelineConfig;
pub use search::{
    Product, ProviderError, SearchError, SearchFuture, SearchMessage, SearchOutcome,
    SearchProvider, UNKNOWN_ERROR_MESSAGE,
};
