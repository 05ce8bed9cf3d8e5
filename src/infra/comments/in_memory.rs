// In-memory implementation of CommentStore.
//
// Useful for local development without a Supabase project, and as a worked
// example of the port: everything inserted is approved immediately, which is
// NOT what the real store does (new rows sit in pending until a moderator
// approves them).

use crate::core::comments::{Comment, NewComment};
use crate::core::submission::{CommentStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct InMemoryCommentStore {
    /// page_key -> rows in insertion order (which is created_at order)
    threads: DashMap<String, Vec<Comment>>,
    next_id: AtomicU64,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self {
            threads: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn fetch_approved(&self, page_key: &str) -> Result<Vec<Comment>, StoreError> {
        let mut rows = self
            .threads
            .get(page_key)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        // The port promises ascending created_at order.
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }

    async fn insert(&self, comment: NewComment) -> Result<(), StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.threads
            .entry(comment.page_key.clone())
            .or_default()
            .push(Comment {
                id: format!("mem-{id}"),
                page_key: comment.page_key,
                parent_id: comment.parent_id,
                author_name: comment.author_name,
                body: comment.body,
                created_at: Utc::now(),
            });
        Ok(())
    }
}

impl Default for InMemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}
