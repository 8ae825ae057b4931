// Adapters layer: concrete implementations for external systems (file formats, storage).

pub mod reader;
pub mod storage;
pub mod writer;
