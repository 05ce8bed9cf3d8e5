// Supabase-backed comment store, speaking the PostgREST interface.
//
// It deliberately exposes only the two calls the core layer needs: read the
// approved slice of one page's thread, and append one comment. Moderation
// status and emails stay server-side: status is only ever a query filter and
// the select list never includes author_email.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;

use crate::core::comments::{Comment, NewComment};
use crate::core::submission::{CommentStore, StoreError};

const SELECT_COLUMNS: &str = "id,page_key,parent_id,author_name,body,created_at";

pub struct SupabaseCommentStore {
    client: Client,
    base_url: String,
}

impl SupabaseCommentStore {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(anon_key).map_err(|e| StoreError(e.to_string()))?,
        );
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", anon_key))
                .map_err(|e| StoreError(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn comments_url(&self) -> String {
        format!("{}/rest/v1/comments", self.base_url)
    }
}

#[async_trait]
impl CommentStore for SupabaseCommentStore {
    async fn fetch_approved(&self, page_key: &str) -> Result<Vec<Comment>, StoreError> {
        let page_filter = format!("eq.{}", page_key);
        let resp = self
            .client
            .get(self.comments_url())
            .query(&[
                ("select", SELECT_COLUMNS),
                ("page_key", page_filter.as_str()),
                ("status", "eq.approved"),
                ("order", "created_at.asc"),
            ])
            .send()
            .await
            .map_err(|e| StoreError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError(format!(
                "Comment query returned {}",
                resp.status()
            )));
        }

        let rows: Vec<ApiComment> = resp.json().await.map_err(|e| StoreError(e.to_string()))?;
        Ok(rows.into_iter().map(ApiComment::into_comment).collect())
    }

    async fn insert(&self, comment: NewComment) -> Result<(), StoreError> {
        let resp = self
            .client
            .post(self.comments_url())
            .header("Prefer", "return=minimal")
            .json(&comment)
            .send()
            .await
            .map_err(|e| StoreError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError(format!(
                "Comment insert returned {}",
                resp.status()
            )));
        }

        Ok(())
    }
}

/// Row shape returned by the store. Ids are opaque to the client, so both
/// uuid-style text keys and numeric keys are accepted and carried as text.
#[derive(Debug, Deserialize)]
struct ApiComment {
    id: OpaqueId,
    page_key: String,
    #[serde(default)]
    parent_id: Option<OpaqueId>,
    author_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpaqueId {
    Text(String),
    Number(i64),
}

impl OpaqueId {
    fn into_string(self) -> String {
        match self {
            OpaqueId::Text(id) => id,
            OpaqueId::Number(id) => id.to_string(),
        }
    }
}

impl ApiComment {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id.into_string(),
            page_key: self.page_key,
            parent_id: self.parent_id.map(OpaqueId::into_string),
            author_name: self.author_name,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_rows_with_text_or_numeric_ids() {
        let json = r#"[
            {"id": "4f9c", "page_key": "first-post", "parent_id": null,
             "author_name": "Ann", "body": "Great post!",
             "created_at": "2026-08-01T10:00:00+00:00"},
            {"id": 7, "page_key": "first-post", "parent_id": "4f9c",
             "author_name": "Bea", "body": "Agreed",
             "created_at": "2026-08-01T11:00:00Z"}
        ]"#;

        let rows: Vec<ApiComment> = serde_json::from_str(json).unwrap();
        let comments: Vec<Comment> = rows.into_iter().map(ApiComment::into_comment).collect();

        assert_eq!(comments[0].id, "4f9c");
        assert!(comments[0].parent_id.is_none());
        assert_eq!(comments[1].id, "7");
        assert_eq!(comments[1].parent_id.as_deref(), Some("4f9c"));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = SupabaseCommentStore::new("https://x.supabase.co/", "key").unwrap();
        assert_eq!(store.comments_url(), "https://x.supabase.co/rest/v1/comments");
    }
}
