//! Async runtime adapter: owns the tokio runtime that provider calls run on.

mod async_runtime;

pub use async_runtime::AsyncRuntime;
