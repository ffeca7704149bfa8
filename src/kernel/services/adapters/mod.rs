//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod catalog;
pub mod config;
pub mod runtime;
pub mod search;

pub use catalog::{CatalogError, CatalogSearchProvider};
pub use config::{load_config, load_config_or_default, ConfigError};
pub use runtime::AsyncRuntime;
pub use search::{SearchService, SearchTask};
