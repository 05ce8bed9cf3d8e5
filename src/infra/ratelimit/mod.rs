// Rate ledger implementations.

pub mod in_memory;
pub mod json_store;

// Re-export for convenience
pub use in_memory::InMemoryLedgerStore;
pub use json_store::JsonLedgerStore;
