use std::time::Instant;

use super::observable::UiStateStore;
use super::search::{Debouncer, Deduplicator, SearchDispatcher, SearchRequest};
use super::services::ports::{PipelineConfig, SearchOutcome};
use super::{Action, Effect};

mod reducer;

use reducer::SearchSignal;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn none() -> Self {
        Self::default()
    }
}

/// 查询管线的全部可变状态，只在宿主线程上通过 `dispatch` 修改
pub struct Store {
    debouncer: Debouncer,
    dedup: Deduplicator,
    dispatcher: SearchDispatcher,
    ui: UiStateStore,
    closed: bool,
}

impl Store {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce()),
            dedup: Deduplicator::new(),
            dispatcher: SearchDispatcher::new(),
            ui: UiStateStore::new(),
            closed: false,
        }
    }

    pub fn ui_state(&self) -> &UiStateStore {
        &self.ui
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.dispatcher.active()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        if self.closed {
            tracing::debug!(action = ?action, "store closed, action ignored");
            return DispatchResult::none();
        }

        match action {
            Action::QueryChanged { query, now } => {
                self.debouncer.on_input(query, now);
                DispatchResult::none()
            }
            Action::Tick { now } => self.flush_debounced(now),
            Action::SearchMessage(msg) => self.reduce_search_message(msg),
            Action::Shutdown => {
                self.debouncer.cancel();
                let effects = self
                    .dispatcher
                    .retire()
                    .map(|generation| Effect::CancelSearch { generation })
                    .into_iter()
                    .collect();
                self.ui.clear();
                self.closed = true;
                tracing::info!("search pipeline shut down");
                DispatchResult {
                    effects,
                    state_changed: false,
                }
            }
        }
    }

    fn flush_debounced(&mut self, now: Instant) -> DispatchResult {
        let Some(query) = self.debouncer.poll(now) else {
            return DispatchResult::none();
        };
        let Some(query) = self.dedup.accept(query) else {
            tracing::debug!(target = "search.pipeline", "duplicate query suppressed");
            return DispatchResult::none();
        };

        let dispatch = self.dispatcher.dispatch(query);
        let generation = dispatch.generation;
        let mut effects = Vec::new();
        if let Some(superseded) = dispatch.superseded {
            effects.push(Effect::CancelSearch {
                generation: superseded,
            });
        }

        let state_changed = match dispatch.request {
            SearchRequest::Blank => {
                self.reduce(generation, SearchSignal::Outcome(SearchOutcome::Empty))
            }
            SearchRequest::Remote(query) => {
                let changed = self.reduce(generation, SearchSignal::Loading);
                effects.push(Effect::StartSearch { generation, query });
                changed
            }
        };

        DispatchResult {
            effects,
            state_changed,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
