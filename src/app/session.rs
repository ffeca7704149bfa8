//! 搜索会话：把输入事件、查询管线和异步搜索服务接在一起
//!
//! 职责：
//! - 接收输入框的原始查询变化
//! - 定时推进防抖计时器，并把搜索结果交给 Store 归约
//! - 执行 Store 产生的 Effect（启动 / 取消搜索）
//! - 会话结束时释放计时器、任务和订阅

use crate::kernel::services::adapters::{AsyncRuntime, SearchService, SearchTask};
use crate::kernel::services::ports::{PipelineConfig, SearchMessage, SearchProvider};
use crate::kernel::services::{search_bus, SearchBusReceiver};
use crate::kernel::{Action, Effect, Store, UiStateStore};
use std::io;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 每次 tick 最多处理的消息数，避免结果洪峰阻塞输入
const MAX_MESSAGE_DRAIN_PER_TICK: usize = 64;

pub struct SearchSession {
    store: Store,
    search: SearchService,
    rx: SearchBusReceiver,
    active_task: Option<SearchTask>,
    tick_interval: Duration,
    // 必须最后释放：任务取消依赖 runtime 仍然存活
    _runtime: Option<AsyncRuntime>,
}

impl SearchSession {
    /// 创建会话并自带一个 tokio runtime
    pub fn new(provider: Arc<dyn SearchProvider>, config: PipelineConfig) -> io::Result<Self> {
        let runtime = AsyncRuntime::new(config.worker_threads)?;
        let handle = runtime.tokio_handle();
        let mut session = Self::with_handle(provider, config, handle);
        session._runtime = Some(runtime);
        Ok(session)
    }

    /// 使用外部 runtime 创建会话
    pub fn with_handle(
        provider: Arc<dyn SearchProvider>,
        config: PipelineConfig,
        handle: tokio::runtime::Handle,
    ) -> Self {
        let (tx, rx) = search_bus();
        tracing::info!(
            debounce_ms = config.debounce_ms,
            tick_interval_ms = config.tick_interval_ms,
            "search session started"
        );
        Self {
            store: Store::new(&config),
            search: SearchService::new(handle, provider, tx),
            rx,
            active_task: None,
            tick_interval: config.tick_interval(),
            _runtime: None,
        }
    }

    pub fn ui_state(&self) -> &UiStateStore {
        self.store.ui_state()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.store.next_deadline()
    }

    pub fn has_active_search(&self) -> bool {
        self.active_task.is_some()
    }

    pub fn on_query_changed(&mut self, query: impl Into<String>) {
        self.on_query_changed_at(query, Instant::now());
    }

    pub fn on_query_changed_at(&mut self, query: impl Into<String>, now: Instant) {
        self.apply(Action::QueryChanged {
            query: query.into(),
            now,
        });
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// 先归约已到达的搜索结果，再检查防抖计时器
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut changed = self.drain_messages();
        changed |= self.apply(Action::Tick { now });
        changed
    }

    /// 阻塞等待下一条搜索消息（最多 `timeout`），随后处理所有已到达的消息
    pub fn wait_for_results(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                let mut changed = self.apply_message(msg);
                changed |= self.drain_messages();
                changed
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("search bus disconnected");
                false
            }
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// 主循环的一步：等待结果，最迟到防抖截止时间或 `max_wait`，然后 tick
    pub fn pump(&mut self, max_wait: Duration) -> bool {
        let mut wait = max_wait;
        if let Some(deadline) = self.next_deadline() {
            wait = wait.min(deadline.saturating_duration_since(Instant::now()));
        }

        let mut changed = false;
        if !wait.is_zero() {
            changed |= self.wait_for_results(wait);
        }
        changed |= self.tick();
        changed
    }

    pub fn is_shut_down(&self) -> bool {
        self.store.is_closed()
    }

    pub fn shutdown(&mut self) {
        if self.store.is_closed() {
            return;
        }
        self.apply(Action::Shutdown);
        if let Some(task) = self.active_task.take() {
            task.cancel();
        }
    }

    fn drain_messages(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..MAX_MESSAGE_DRAIN_PER_TICK {
            match self.rx.try_recv() {
                Ok(msg) => changed |= self.apply_message(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("search bus disconnected");
                    break;
                }
            }
        }
        changed
    }

    fn apply_message(&mut self, msg: SearchMessage) -> bool {
        let generation = msg.generation();
        if self
            .active_task
            .as_ref()
            .is_some_and(|task| task.generation() == generation)
        {
            self.active_task = None;
        }
        self.apply(Action::SearchMessage(msg))
    }

    fn apply(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartSearch { generation, query } => {
                tracing::debug!(
                    generation,
                    query_len = query.len(),
                    target = "search.pipeline",
                    "start search"
                );
                if let Some(previous) = self.active_task.take() {
                    previous.cancel();
                }
                self.active_task = Some(self.search.start(generation, query));
            }
            Effect::CancelSearch { generation } => {
                let matches = self
                    .active_task
                    .as_ref()
                    .is_some_and(|task| task.generation() == generation);
                if matches {
                    if let Some(task) = self.active_task.take() {
                        task.cancel();
                    }
                }
            }
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/session.rs"]
mod tests;
