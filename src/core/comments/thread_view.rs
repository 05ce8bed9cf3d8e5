// Two-level thread view over the flat comment list.
//
// The store returns comments sorted by created_at ascending; build preserves
// that order and never re-sorts. A reply whose parent_id does not point at a
// top-level comment (an orphan, or a reply-to-a-reply that slipped past the
// gate) is dropped from every bucket rather than treated as an error.

use super::comment_models::Comment;

/// A top-level comment together with its direct replies.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadedComment {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// The rendered shape of one page's discussion.
///
/// An empty thread is a valid state (`top_level` is empty) and is distinct
/// from a load failure, which never produces a `CommentThread` at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentThread {
    pub top_level: Vec<ThreadedComment>,
}

impl CommentThread {
    /// Partition a flat, already-sorted list into the two-level view.
    pub fn build(comments: Vec<Comment>) -> Self {
        let mut top_level: Vec<ThreadedComment> = comments
            .iter()
            .filter(|c| c.parent_id.is_none())
            .map(|c| ThreadedComment {
                comment: c.clone(),
                replies: Vec::new(),
            })
            .collect();

        for reply in comments.into_iter().filter(|c| c.parent_id.is_some()) {
            let parent_id = reply.parent_id.clone().unwrap_or_default();
            if let Some(bucket) = top_level
                .iter_mut()
                .find(|t| t.comment.id == parent_id)
            {
                bucket.replies.push(reply);
            }
        }

        Self { top_level }
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    /// Whether `id` names a top-level comment of this thread. The gate uses
    /// this to refuse replies to replies.
    pub fn contains_top_level(&self, id: &str) -> bool {
        self.top_level.iter().any(|t| t.comment.id == id)
    }

    /// Total comments visible in the view, replies included.
    pub fn len(&self) -> usize {
        self.top_level
            .iter()
            .map(|t| 1 + t.replies.len())
            .sum()
    }
}
