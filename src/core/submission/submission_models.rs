// Submission domain models - the raw candidate, gate thresholds, the
// session context, and the outcome reported back to the caller.

use crate::core::comments::CommentThread;
use chrono::{DateTime, Duration, Utc};

/// Raw values captured from the authoring form, untrimmed.
///
/// `honeypot` is the hidden field no human ever fills in; `form_opened_at`
/// is taken when the form (or reply form - each carries its own timer) was
/// shown, so dwell time can be measured at submit.
#[derive(Debug, Clone)]
pub struct CommentInput {
    pub author_name: String,
    /// Empty string means the optional field was left blank
    pub author_email: String,
    pub body: String,
    /// Present only on reply forms
    pub parent_id: Option<String>,
    pub honeypot: String,
    pub form_opened_at: DateTime<Utc>,
}

/// Thresholds for the abuse-resistance gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Minimum time the form must stay open before a submit is accepted
    pub min_dwell: Duration,
    /// Trailing window the rate ceiling applies to
    pub rate_window: Duration,
    /// Maximum accepted submissions inside the window
    pub rate_limit_max: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_dwell: Duration::milliseconds(3000),   // 3 seconds before submit
            rate_window: Duration::milliseconds(600_000), // 10 minutes
            rate_limit_max: 5,                         // 5 comments per window
        }
    }
}

/// What happened to an accepted-looking submission.
///
/// Both variants are presented to the visitor as success. `Trapped` means
/// the honeypot fired and the candidate was silently discarded - telling a
/// bot it was detected would only help it adapt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The comment reached the store and the thread was reloaded
    Posted,
    /// Honeypot tripped; nothing was stored
    Trapped,
}

/// Session-scoped state for one page's comment surface.
///
/// Created when the page comes up, discarded on navigation. The thread
/// snapshot is replaced wholesale on every reload, never patched, and
/// `None` until the first successful load - which keeps a load failure
/// distinguishable from a legitimately empty thread. Submissions take the
/// session by `&mut`, so a second submit cannot start while one is in
/// flight.
#[derive(Debug)]
pub struct CommentSession {
    pub page_key: String,
    pub thread: Option<CommentThread>,
}

impl CommentSession {
    pub fn new(page_key: impl Into<String>) -> Self {
        Self {
            page_key: page_key.into(),
            thread: None,
        }
    }
}
