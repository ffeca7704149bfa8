use std::time::Instant;

use crate::kernel::services::ports::SearchMessage;

#[derive(Debug, Clone)]
pub enum Action {
    QueryChanged { query: String, now: Instant },
    Tick { now: Instant },
    SearchMessage(SearchMessage),
    Shutdown,
}
