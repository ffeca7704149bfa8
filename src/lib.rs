//! product-search - 商品搜索页的查询管线
//!
//! 模块结构：
//! - kernel: 管线核心（防抖、去重、generation 调度、状态归约、UiState 存储）
//! - kernel::services: 端口（provider 契约、配置）与适配器（tokio runtime、搜索服务、本地目录）
//! - app: 会话层（SearchSession），把输入、管线和异步搜索接在一起

pub mod app;
pub mod kernel;
