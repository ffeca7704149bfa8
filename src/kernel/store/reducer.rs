use crate::kernel::services::ports::{SearchError, SearchMessage, SearchOutcome};
use crate::kernel::UiState;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SearchSignal {
    Loading,
    Outcome(SearchOutcome),
}

impl super::Store {
    /// 过期的 generation 直接丢弃，其余映射为 `UiState` 并发布
    pub(super) fn reduce(&mut self, generation: u64, signal: SearchSignal) -> bool {
        if !self.dispatcher.is_current(generation) {
            tracing::debug!(
                generation,
                current = self.dispatcher.current(),
                target = "search.pipeline",
                "stale search signal dropped"
            );
            return false;
        }

        let next = match signal {
            SearchSignal::Loading => UiState::Loading,
            SearchSignal::Outcome(SearchOutcome::Empty) => UiState::Success(Vec::new()),
            SearchSignal::Outcome(SearchOutcome::Results(products)) => UiState::Success(products),
            SearchSignal::Outcome(SearchOutcome::Failure(message)) => UiState::Error(message),
        };
        self.ui.publish(next)
    }

    pub(super) fn reduce_search_message(&mut self, msg: SearchMessage) -> super::DispatchResult {
        let state_changed = match msg {
            SearchMessage::Completed {
                generation,
                outcome,
            } => {
                self.dispatcher.finish(generation);
                self.reduce(generation, SearchSignal::Outcome(outcome))
            }
            SearchMessage::Cancelled { generation } => {
                let was_active = self.dispatcher.active() == Some(generation);
                self.dispatcher.finish(generation);
                if was_active {
                    // 当前任务不是被新查询取代的，按管线内部错误处理
                    let error = SearchError::pipeline("Search was cancelled unexpectedly");
                    self.reduce(
                        generation,
                        SearchSignal::Outcome(SearchOutcome::Failure(error.user_message())),
                    )
                } else {
                    false
                }
            }
        };

        super::DispatchResult {
            effects: Vec::new(),
            state_changed,
        }
    }
}
