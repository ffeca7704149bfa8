//! Headless pipeline core (state/action/effect).

pub mod action;
pub mod effect;
pub mod observable;
pub mod search;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use effect::Effect;
pub use observable::{Subscription, UiStateStore};
pub use search::{is_blank, Debouncer, Deduplicator, SearchDispatcher};
pub use state::UiState;
pub use store::{DispatchResult, Store};
