use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

pub type Result<T> = std::result::Result<T, SearchError>;

pub type SearchFuture =
    Pin<Box<dyn Future<Output = std::result::Result<Vec<Product>, ProviderError>> + Send + 'static>>;

/// 数据层提供的搜索入口
///
/// `search` 可以同步返回错误的 future，也可以在 future 内部 panic，
/// 两种情况都会被 `SearchService` 转成失败结果。
pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str) -> SearchFuture;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("{}", .message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
pub struct ProviderError {
    pub message: Option<String>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("{}", .message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
    Pipeline { message: Option<String> },
}

impl SearchError {
    pub fn pipeline(message: impl Into<String>) -> Self {
        SearchError::Pipeline {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SearchError::Provider(e) => e.message.as_deref(),
            SearchError::Pipeline { message } => message.as_deref(),
        }
    }

    /// 展示给用户的错误文本，缺省时回退到 `UNKNOWN_ERROR_MESSAGE`
    pub fn user_message(&self) -> String {
        self.message()
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Empty,
    Results(Vec<Product>),
    Failure(String),
}

impl From<Result<Vec<Product>>> for SearchOutcome {
    fn from(result: Result<Vec<Product>>) -> Self {
        match result {
            Ok(products) => SearchOutcome::Results(products),
            Err(e) => SearchOutcome::Failure(e.user_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchMessage {
    Completed {
        generation: u64,
        outcome: SearchOutcome,
    },
    Cancelled {
        generation: u64,
    },
}

impl SearchMessage {
    pub fn generation(&self) -> u64 {
        match self {
            SearchMessage::Completed { generation, .. } => *generation,
            SearchMessage::Cancelled { generation } => *generation,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/search.rs"]
mod tests;
