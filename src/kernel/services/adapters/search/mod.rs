//! 搜索服务模块
//!
//! - SearchService: 在 tokio runtime 上执行 provider 调用
//! - SearchTask: 单次调用的句柄（generation + 取消标记）

mod service;

pub use service::{SearchService, SearchTask};
