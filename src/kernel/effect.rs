#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartSearch { generation: u64, query: String },
    CancelSearch { generation: u64 },
}
