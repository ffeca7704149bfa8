//! 商品搜索服务
//!
//! 每次调用 `start` 生成一个 `SearchTask`，结果通过 search bus 回传给宿主线程。

use crate::kernel::services::bus::SearchBusSender;
use crate::kernel::services::ports::{
    ProviderError, SearchError, SearchMessage, SearchOutcome, SearchProvider,
};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinError};

pub struct SearchTask {
    generation: u64,
    cancelled: Arc<AtomicBool>,
    call: AbortHandle,
}

impl SearchTask {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        self.call.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.call.is_finished()
    }
}

pub struct SearchService {
    runtime: tokio::runtime::Handle,
    provider: Arc<dyn SearchProvider>,
    tx: SearchBusSender,
}

impl SearchService {
    pub fn new(
        runtime: tokio::runtime::Handle,
        provider: Arc<dyn SearchProvider>,
        tx: SearchBusSender,
    ) -> Self {
        Self {
            runtime,
            provider,
            tx,
        }
    }

    /// 异步调用 provider，完成后发送 `SearchMessage`
    pub fn start(&self, generation: u64, query: String) -> SearchTask {
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_for_check = cancelled.clone();
        let provider = self.provider.clone();
        let tx = self.tx.clone();

        // provider.search 本身也放进任务里执行，同步 panic 同样由 JoinHandle 接住
        let call = self
            .runtime
            .spawn(async move { provider.search(&query).await });
        let abort = call.abort_handle();

        self.runtime.spawn(async move {
            let joined = call.await;
            if cancelled_for_check.load(Ordering::Relaxed) {
                tracing::debug!(generation, target = "search.pipeline", "search cancelled");
                let _ = tx.send(SearchMessage::Cancelled { generation });
                return;
            }

            let outcome = match joined {
                Ok(result) => SearchOutcome::from(result.map_err(SearchError::from)),
                Err(e) => SearchOutcome::from(Err(join_error_to_search_error(e))),
            };
            if let SearchOutcome::Failure(message) = &outcome {
                tracing::warn!(generation, error = %message, "search failed");
            }
            let _ = tx.send(SearchMessage::Completed {
                generation,
                outcome,
            });
        });

        SearchTask {
            generation,
            cancelled,
            call: abort,
        }
    }
}

fn join_error_to_search_error(e: JoinError) -> SearchError {
    if e.is_panic() {
        let message = panic_message(e.into_panic());
        return SearchError::Provider(ProviderError { message });
    }
    SearchError::pipeline(format!("Search task failed: {}", e))
}

fn panic_message(payload: Box<dyn Any + Send>) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return Some((*s).to_string());
    }
    payload.downcast_ref::<String>().cloned()
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/service.rs"]
mod tests;
