// Comment store implementations.

pub mod in_memory;
pub mod supabase_store;

// Re-export for convenience
pub use in_memory::InMemoryCommentStore;
pub use supabase_store::SupabaseCommentStore;
