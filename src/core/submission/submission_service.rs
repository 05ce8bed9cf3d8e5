// Submission pipeline - core business logic for posting a comment.
//
// A candidate runs through an ordered gate before the store is ever
// contacted:
// 1. Honeypot       - bot trap; reported as success, nothing stored
// 2. Dwell time     - form must have been open for a minimum interval
// 3. Field bounds   - name/body required with limits, email optional
// 4. Moderation     - bilingual profanity filter over name and body
// 5. Rate ceiling   - sliding-window count of past accepted submissions
//
// Order matters: the cheap structural checks run before anything that could
// leak detection detail to an automated submitter. Only a successful store
// write consumes rate budget.
//
// NO transport or rendering here - just the decision logic and the ports.

use super::submission_models::{CommentInput, CommentSession, GateConfig, SubmissionOutcome};
use crate::core::comments::{Comment, CommentThread, NewComment};
use crate::core::moderation::{Lexicon, ProfanityFilter};
use crate::core::ratelimit::{RateLedger, RateLedgerStore};
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

const MAX_NAME_CHARS: usize = 80;
const MAX_BODY_CHARS: usize = 5000;
const MAX_EMAIL_CHARS: usize = 254;

// ============================================================================
// ERRORS
// ============================================================================

/// Why a submission (or a thread load) was refused.
///
/// Every variant except `Store` and `Load` is resolved locally without
/// contacting the remote store. The messages are the user-visible inline
/// text, so they stay generic: moderation rejections never echo which word
/// matched.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),

    #[error("Your comment contains language that is not allowed. Please revise and try again.")]
    ContentPolicy,

    #[error("You are posting too quickly. Please wait a few minutes.")]
    RateLimit,

    #[error("Please take a moment before submitting.")]
    Timing,

    #[error("Failed to post comment. Please try again.")]
    Store(String),

    #[error("Could not load comments. Please try again later.")]
    Load(String),
}

/// Error raised by a comment store implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for the remote append-only comment store.
///
/// The store assigns id, created_at and moderation status; the client only
/// ever reads approved rows and never reads emails back.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Approved comments for one page, sorted created_at ascending.
    async fn fetch_approved(&self, page_key: &str) -> Result<Vec<Comment>, StoreError>;

    /// Insert one comment. The response body is not needed.
    async fn insert(&self, comment: NewComment) -> Result<(), StoreError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Orchestrates gate, store and ledger for one page's comment surface.
///
/// The profanity filter is an explicit optional dependency: passing `None`
/// disables lexical moderation as a configuration choice, there is no
/// runtime probing.
pub struct SubmissionService<S: CommentStore, L: RateLedgerStore> {
    store: S,
    ledger: RateLedger<L>,
    filter: Option<ProfanityFilter>,
    config: GateConfig,
}

impl<S: CommentStore, L: RateLedgerStore> SubmissionService<S, L> {
    pub fn new(store: S, ledger_store: L, filter: Option<ProfanityFilter>, config: GateConfig) -> Self {
        Self {
            store,
            ledger: RateLedger::new(ledger_store),
            filter,
            config,
        }
    }

    /// Fetch approved comments and replace the session's thread snapshot
    /// wholesale. On failure the previous snapshot is left untouched.
    pub async fn load_thread(&self, session: &mut CommentSession) -> Result<(), SubmissionError> {
        let rows = self
            .store
            .fetch_approved(&session.page_key)
            .await
            .map_err(|e| SubmissionError::Load(e.to_string()))?;

        session.thread = Some(CommentThread::build(rows));
        Ok(())
    }

    /// Run a candidate through the gate and, on acceptance, post it and
    /// refresh the thread.
    ///
    /// `Ok(Trapped)` means the honeypot fired: the caller must present it as
    /// success while nothing was stored.
    pub async fn submit(
        &self,
        session: &mut CommentSession,
        input: CommentInput,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        // 1. Honeypot - silently discard, do not signal detection
        if !input.honeypot.trim().is_empty() {
            tracing::info!(page_key = %session.page_key, "Honeypot tripped, discarding submission");
            return Ok(SubmissionOutcome::Trapped);
        }

        let now = Utc::now();

        // 2. Dwell time
        if now - input.form_opened_at < self.config.min_dwell {
            return Err(SubmissionError::Timing);
        }

        // 3. Field validation, on trimmed values
        let author_name = input.author_name.trim();
        let author_email = input.author_email.trim();
        let body = input.body.trim();

        if author_name.is_empty() {
            return Err(SubmissionError::Validation("Please enter your name.".to_string()));
        }
        if author_name.chars().count() > MAX_NAME_CHARS {
            return Err(SubmissionError::Validation(
                "Name is too long (max 80 characters).".to_string(),
            ));
        }
        if body.is_empty() {
            return Err(SubmissionError::Validation("Please enter a comment.".to_string()));
        }
        if body.chars().count() > MAX_BODY_CHARS {
            return Err(SubmissionError::Validation(
                "Comment is too long (max 5,000 characters).".to_string(),
            ));
        }
        if author_email.chars().count() > MAX_EMAIL_CHARS {
            return Err(SubmissionError::Validation("Email is too long.".to_string()));
        }

        // A reply must target a top-level comment of the loaded thread.
        // Replies to replies are refused here instead of being silently
        // dropped from the view later.
        let parent_id = input
            .parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        if let Some(parent) = &parent_id {
            let known = session
                .thread
                .as_ref()
                .is_some_and(|t| t.contains_top_level(parent));
            if !known {
                return Err(SubmissionError::Validation(
                    "That comment can no longer be replied to.".to_string(),
                ));
            }
        }

        // 4. Moderation
        if let Some(filter) = &self.filter {
            let name_verdict = filter.check(author_name);
            let body_verdict = filter.check(body);
            if name_verdict.flagged || body_verdict.flagged {
                let lexicon: Option<Lexicon> = name_verdict.lexicon.or(body_verdict.lexicon);
                tracing::info!(
                    page_key = %session.page_key,
                    lexicon = ?lexicon,
                    "Submission rejected by profanity filter"
                );
                return Err(SubmissionError::ContentPolicy);
            }
        }

        // 5. Rate ceiling
        let recent = self.ledger.count_within(now, self.config.rate_window).await;
        if recent >= self.config.rate_limit_max {
            return Err(SubmissionError::RateLimit);
        }

        // Hand off to the store. Optional fields are omitted, never empty.
        let payload = NewComment {
            page_key: session.page_key.clone(),
            author_name: author_name.to_string(),
            body: body.to_string(),
            parent_id,
            author_email: (!author_email.is_empty()).then(|| author_email.to_string()),
        };

        self.store
            .insert(payload)
            .await
            .map_err(|e| SubmissionError::Store(e.to_string()))?;

        // Only a write that actually landed consumes rate budget.
        self.ledger.record(now, self.config.rate_window).await;

        // Reflect the new state before the caller re-enables the form. The
        // comment is already stored at this point, so a reload failure is
        // confined to the thread display instead of masquerading as a failed
        // submission - reporting an error here would invite a double post.
        if let Err(err) = self.load_thread(session).await {
            tracing::warn!(
                page_key = %session.page_key,
                "Thread reload after post failed: {err:?}"
            );
        }

        Ok(SubmissionOutcome::Posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ratelimit::LedgerError;
    use chrono::{DateTime, Duration};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    struct MockCommentStore {
        rows: RwLock<Vec<Comment>>,
        inserted: RwLock<Vec<NewComment>>,
        fail_insert: bool,
        fail_fetch: bool,
    }

    impl MockCommentStore {
        fn new() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
                inserted: RwLock::new(Vec::new()),
                fail_insert: false,
                fail_fetch: false,
            }
        }

        fn with_rows(rows: Vec<Comment>) -> Self {
            let store = Self::new();
            *store.rows.try_write().unwrap() = rows;
            store
        }

        fn failing_insert() -> Self {
            Self {
                fail_insert: true,
                ..Self::new()
            }
        }

        fn failing_fetch() -> Self {
            Self {
                fail_fetch: true,
                ..Self::new()
            }
        }

        async fn insert_count(&self) -> usize {
            self.inserted.read().await.len()
        }
    }

    #[async_trait]
    impl CommentStore for MockCommentStore {
        async fn fetch_approved(&self, page_key: &str) -> Result<Vec<Comment>, StoreError> {
            if self.fail_fetch {
                return Err(StoreError("connection refused".to_string()));
            }
            Ok(self
                .rows
                .read()
                .await
                .iter()
                .filter(|c| c.page_key == page_key)
                .cloned()
                .collect())
        }

        async fn insert(&self, comment: NewComment) -> Result<(), StoreError> {
            if self.fail_insert {
                return Err(StoreError("insert failed".to_string()));
            }
            // Mimic the store: assign id/created_at and approve immediately
            // so the reload sees the new row.
            let mut rows = self.rows.write().await;
            let id = format!("c{}", rows.len() + 1);
            rows.push(Comment {
                id,
                page_key: comment.page_key.clone(),
                parent_id: comment.parent_id.clone(),
                author_name: comment.author_name.clone(),
                body: comment.body.clone(),
                created_at: Utc::now(),
            });
            self.inserted.write().await.push(comment);
            Ok(())
        }
    }

    struct MockLedgerStore {
        data: Arc<RwLock<Vec<DateTime<Utc>>>>,
        writes: Arc<RwLock<usize>>,
    }

    impl MockLedgerStore {
        fn new(data: Vec<DateTime<Utc>>) -> Self {
            Self {
                data: Arc::new(RwLock::new(data)),
                writes: Arc::new(RwLock::new(0)),
            }
        }

        /// Handle kept by the test after the store moves into the service.
        fn write_counter(&self) -> Arc<RwLock<usize>> {
            Arc::clone(&self.writes)
        }
    }

    #[async_trait]
    impl RateLedgerStore for MockLedgerStore {
        async fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, LedgerError> {
            Ok(self.data.read().await.clone())
        }

        async fn replace(&self, timestamps: Vec<DateTime<Utc>>) -> Result<(), LedgerError> {
            *self.data.write().await = timestamps;
            *self.writes.write().await += 1;
            Ok(())
        }
    }

    fn service(
        store: MockCommentStore,
        ledger: MockLedgerStore,
    ) -> SubmissionService<MockCommentStore, MockLedgerStore> {
        SubmissionService::new(store, ledger, Some(ProfanityFilter::new()), GateConfig::default())
    }

    fn session() -> CommentSession {
        CommentSession::new("first-post")
    }

    /// A candidate that passes every check with the default thresholds.
    fn input(name: &str, body: &str) -> CommentInput {
        CommentInput {
            author_name: name.to_string(),
            author_email: String::new(),
            body: body.to_string(),
            parent_id: None,
            honeypot: String::new(),
            form_opened_at: Utc::now() - Duration::seconds(10),
        }
    }

    #[tokio::test]
    async fn honeypot_reports_success_without_store_write() {
        let svc = service(MockCommentStore::new(), MockLedgerStore::new(Vec::new()));
        let mut session = session();

        let mut bot = input("Ann", "Great post!");
        bot.honeypot = "https://spam.example".to_string();

        let outcome = svc.submit(&mut session, bot).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Trapped);
        assert_eq!(svc.store.insert_count().await, 0);
    }

    #[tokio::test]
    async fn too_fast_submission_is_rejected() {
        let svc = service(MockCommentStore::new(), MockLedgerStore::new(Vec::new()));
        let mut session = session();

        let mut hasty = input("Ann", "Great post!");
        hasty.form_opened_at = Utc::now();

        let err = svc.submit(&mut session, hasty).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Timing));
        assert_eq!(svc.store.insert_count().await, 0);
    }

    #[tokio::test]
    async fn field_bounds_are_enforced_on_trimmed_values() {
        let svc = service(MockCommentStore::new(), MockLedgerStore::new(Vec::new()));
        let mut session = session();

        let cases = [
            input("   ", "Great post!"),
            input(&"x".repeat(81), "Great post!"),
            input("Ann", "   "),
            input("Ann", &"y".repeat(5001)),
        ];
        for candidate in cases {
            let err = svc.submit(&mut session, candidate).await.unwrap_err();
            assert!(matches!(err, SubmissionError::Validation(_)));
        }

        let mut long_email = input("Ann", "Great post!");
        long_email.author_email = format!("{}@example.com", "a".repeat(250));
        let err = svc.submit(&mut session, long_email).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));

        assert_eq!(svc.store.insert_count().await, 0);
    }

    #[tokio::test]
    async fn profane_body_is_rejected_before_the_store_is_contacted() {
        let svc = service(MockCommentStore::new(), MockLedgerStore::new(Vec::new()));
        let mut session = session();

        let err = svc.submit(&mut session, input("Ann", "fuck this")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::ContentPolicy));

        let err = svc.submit(&mut session, input("卧槽", "Nice write-up")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::ContentPolicy));

        assert_eq!(svc.store.insert_count().await, 0);
    }

    #[tokio::test]
    async fn absent_filter_disables_moderation() {
        let svc = SubmissionService::new(
            MockCommentStore::new(),
            MockLedgerStore::new(Vec::new()),
            None,
            GateConfig::default(),
        );
        let mut session = session();

        let outcome = svc.submit(&mut session, input("Ann", "fuck this")).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Posted);
    }

    #[tokio::test]
    async fn rate_ceiling_rejects_at_max_and_recovers_as_entries_age_out() {
        let now = Utc::now();

        // Exactly the ceiling inside the window: rejected.
        let full = MockLedgerStore::new(vec![now - Duration::minutes(1); 5]);
        let svc = service(MockCommentStore::new(), full);
        let mut s = session();
        let err = svc.submit(&mut s, input("Ann", "Great post!")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::RateLimit));
        assert_eq!(svc.store.insert_count().await, 0);

        // One entry aged out of the 10-minute window: accepted again.
        let mut stamps = vec![now - Duration::minutes(1); 4];
        stamps.push(now - Duration::minutes(11));
        let svc = service(MockCommentStore::new(), MockLedgerStore::new(stamps));
        let mut s = session();
        let outcome = svc.submit(&mut s, input("Ann", "Great post!")).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Posted);
    }

    #[tokio::test]
    async fn failed_store_write_consumes_no_rate_budget() {
        let ledger = MockLedgerStore::new(Vec::new());
        let writes = ledger.write_counter();
        let svc = service(MockCommentStore::failing_insert(), ledger);
        let mut session = session();

        let err = svc.submit(&mut session, input("Ann", "Great post!")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Store(_)));
        assert_eq!(*writes.read().await, 0);
    }

    #[tokio::test]
    async fn accepted_submission_reaches_store_and_refreshes_the_thread() {
        let ledger = MockLedgerStore::new(Vec::new());
        let writes = ledger.write_counter();
        let svc = service(MockCommentStore::new(), ledger);
        let mut session = session();

        let mut candidate = input("  Ann  ", "  Great post!  ");
        candidate.author_email = String::new();

        let outcome = svc.submit(&mut session, candidate).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Posted);

        // The store saw trimmed values and no optional fields.
        let inserted = svc.store.inserted.read().await;
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].author_name, "Ann");
        assert_eq!(inserted[0].body, "Great post!");
        assert_eq!(inserted[0].page_key, "first-post");
        assert!(inserted[0].parent_id.is_none());
        assert!(inserted[0].author_email.is_none());
        drop(inserted);

        // The session snapshot was rebuilt and shows the new top-level entry.
        let thread = session.thread.as_ref().unwrap();
        assert_eq!(thread.top_level.len(), 1);
        assert_eq!(thread.top_level[0].comment.author_name, "Ann");

        // The ledger recorded exactly one successful submission.
        assert_eq!(*writes.read().await, 1);
    }

    #[tokio::test]
    async fn replies_must_target_a_loaded_top_level_comment() {
        let existing = Comment {
            id: "top1".to_string(),
            page_key: "first-post".to_string(),
            parent_id: None,
            author_name: "Bea".to_string(),
            body: "First!".to_string(),
            created_at: Utc::now() - Duration::hours(1),
        };
        let svc = service(
            MockCommentStore::with_rows(vec![existing]),
            MockLedgerStore::new(Vec::new()),
        );
        let mut session = session();
        svc.load_thread(&mut session).await.unwrap();

        // Unknown parent is refused.
        let mut stray = input("Ann", "Replying to nothing");
        stray.parent_id = Some("no-such-id".to_string());
        let err = svc.submit(&mut session, stray).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));

        // A real top-level target goes through and lands in its bucket.
        let mut reply = input("Ann", "Agreed!");
        reply.parent_id = Some("top1".to_string());
        svc.submit(&mut session, reply).await.unwrap();

        let thread = session.thread.as_ref().unwrap();
        assert_eq!(thread.top_level.len(), 1);
        assert_eq!(thread.top_level[0].replies.len(), 1);
        assert_eq!(thread.top_level[0].replies[0].author_name, "Ann");
    }

    #[tokio::test]
    async fn reload_failure_after_a_stored_post_still_reports_success() {
        // Insert works, fetch is down: the comment landed, so the caller
        // must see success (an error would invite a retry and a double
        // post). The snapshot just stays stale.
        let ledger = MockLedgerStore::new(Vec::new());
        let writes = ledger.write_counter();
        let svc = service(MockCommentStore::failing_fetch(), ledger);
        let mut session = session();

        let outcome = svc.submit(&mut session, input("Ann", "Great post!")).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Posted);
        assert_eq!(svc.store.insert_count().await, 1);
        assert_eq!(*writes.read().await, 1);
        assert!(session.thread.is_none());
    }

    #[tokio::test]
    async fn load_failure_leaves_the_snapshot_untouched() {
        let svc = service(MockCommentStore::failing_fetch(), MockLedgerStore::new(Vec::new()));
        let mut session = session();

        let err = svc.load_thread(&mut session).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Load(_)));
        // Never loaded: still None, distinct from an empty thread.
        assert!(session.thread.is_none());
    }
}
