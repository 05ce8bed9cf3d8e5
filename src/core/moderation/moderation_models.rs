// Moderation domain models.
//
// A verdict carries which lexicon matched so callers can log or localize
// the rejection without re-scanning the text.

use std::fmt;

/// Which language lexicon produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexicon {
    /// English word list, whole-word matching
    English,
    /// Chinese phrase list, substring matching
    Chinese,
}

impl fmt::Display for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexicon::English => write!(f, "en"),
            Lexicon::Chinese => write!(f, "cn"),
        }
    }
}

/// Result of scanning a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationVerdict {
    /// Whether the text contains disallowed language
    pub flagged: bool,
    /// Which lexicon matched, if any
    pub lexicon: Option<Lexicon>,
}

impl ModerationVerdict {
    /// Text is clean.
    pub fn clean() -> Self {
        Self {
            flagged: false,
            lexicon: None,
        }
    }

    /// Text matched the given lexicon.
    pub fn flagged(lexicon: Lexicon) -> Self {
        Self {
            flagged: true,
            lexicon: Some(lexicon),
        }
    }
}
