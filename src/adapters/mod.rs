// Adapters layer: concrete implementations for external systems (workbooks, storage).

pub mod storage;
pub mod xlsx;
