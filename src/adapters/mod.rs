// Adapters layer: concrete implementations for external systems (filesystem, etc.)

pub mod storage;
