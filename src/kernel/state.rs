use crate::kernel::services::ports::Product;

/// 渲染层可见的全部状态
///
/// `Initial` 只在第一次查询被处理之前出现，之后不会再回到该状态。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Initial,
    Loading,
    Success(Vec<Product>),
    Error(String),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn products(&self) -> &[Product] {
        match self {
            UiState::Success(products) => products,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
