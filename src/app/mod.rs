//! 应用层：搜索会话

mod session;

pub use session::SearchSession;
