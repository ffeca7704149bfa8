//! Query pipeline stages that run before a search is dispatched.
//!
//! - `Debouncer`: single pending value + deadline, emits after a quiet period
//! - `Deduplicator`: drops a value equal to the last forwarded one
//! - `SearchDispatcher`: owns the generation counter and the active task id

use std::time::{Duration, Instant};

pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<String>,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            deadline: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// 覆盖待发送的值并重新计时
    pub fn on_input(&mut self, query: String, now: Instant) {
        self.pending = Some(query);
        self.deadline = Some(now + self.quiet);
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        let overshoot = now.duration_since(deadline);
        if overshoot.as_millis() > 5 {
            tracing::debug!(
                overshoot_ms = overshoot.as_millis() as u64,
                target = "search.pipeline",
                "query debounce overshoot"
            );
        }

        self.deadline = None;
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    last: Option<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, query: String) -> Option<String> {
        if self.last.as_deref() == Some(query.as_str()) {
            return None;
        }
        self.last = Some(query.clone());
        Some(query)
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// 空白查询：不调用 provider，直接给出空结果
    Blank,
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub generation: u64,
    pub superseded: Option<u64>,
    pub request: SearchRequest,
}

#[derive(Debug, Clone, Default)]
pub struct SearchDispatcher {
    generation: u64,
    active: Option<u64>,
}

impl SearchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, query: String) -> Dispatch {
        self.generation += 1;
        let generation = self.generation;
        let superseded = self.active.take();

        let request = if is_blank(&query) {
            SearchRequest::Blank
        } else {
            self.active = Some(generation);
            SearchRequest::Remote(query)
        };

        tracing::debug!(
            generation,
            superseded = ?superseded,
            blank = matches!(request, SearchRequest::Blank),
            target = "search.pipeline",
            "dispatch query"
        );

        Dispatch {
            generation,
            superseded,
            request,
        }
    }

    pub fn current(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation != 0 && generation == self.generation
    }

    pub fn active(&self) -> Option<u64> {
        self.active
    }

    pub fn finish(&mut self, generation: u64) {
        if self.active == Some(generation) {
            self.active = None;
        }
    }

    /// 放弃当前任务（会话结束时使用），返回需要取消的 generation
    pub fn retire(&mut self) -> Option<u64> {
        self.active.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
