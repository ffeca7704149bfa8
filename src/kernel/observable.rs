//! Replay-latest holder for the current [`UiState`].
//!
//! # Invariants
//!
//! 1. A new subscriber receives the current value synchronously inside
//!    [`UiStateStore::subscribe`], before any later publish.
//! 2. Observers are notified in registration order.
//! 3. Publishing a value equal to the current one is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the observer before the next
//!    notification; an observer removed mid-notification is skipped.
//! 5. Only the kernel publishes (`publish` is crate-private).
//!
//! The store is `Rc<RefCell<..>>` based: it lives on the host thread together
//! with the rest of the pipeline state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::state::UiState;

type Observer = Rc<RefCell<dyn FnMut(&UiState)>>;

struct Inner {
    value: UiState,
    version: u64,
    next_id: u64,
    observers: Vec<(u64, Observer)>,
}

impl Inner {
    fn is_subscribed(&self, id: u64) -> bool {
        self.observers.iter().any(|(oid, _)| *oid == id)
    }
}

#[derive(Clone)]
pub struct UiStateStore {
    inner: Rc<RefCell<Inner>>,
}

/// RAII guard returned by [`UiStateStore::subscribe`].
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    inner: Weak<RefCell<Inner>>,
}

impl Default for UiStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UiStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("UiStateStore")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl UiStateStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: UiState::Initial,
                version: 0,
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> UiState {
        self.inner.borrow().value.clone()
    }

    /// Number of value changes since creation.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    pub fn subscribe(&self, observer: impl FnMut(&UiState) + 'static) -> Subscription {
        let observer: Observer = Rc::new(RefCell::new(observer));
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, observer.clone()));
            (id, inner.value.clone())
        };

        if let Ok(mut f) = observer.try_borrow_mut() {
            (&mut *f)(&current);
        }

        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub(crate) fn publish(&self, state: UiState) -> bool {
        let observers: Vec<(u64, Observer)> = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == state {
                return false;
            }
            inner.value = state.clone();
            inner.version += 1;
            inner.observers.clone()
        };

        for (id, observer) in observers {
            if !self.inner.borrow().is_subscribed(id) {
                continue;
            }
            // 观察者在回调里再次触发 publish 时跳过自身，避免 RefCell 重入
            if let Ok(mut f) = observer.try_borrow_mut() {
                (&mut *f)(&state);
            }
        }
        true
    }

    /// 会话结束时释放全部观察者
    pub(crate) fn clear(&self) {
        self.inner.borrow_mut().observers.clear();
    }
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let active = inner.borrow().is_subscribed(self.id);
        active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().observers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/observable.rs"]
mod tests;
