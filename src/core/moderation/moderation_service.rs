// Profanity filter - core business logic for lexical moderation.
//
// Two detection strategies, checked in order:
// - English: one case-insensitive regex with \b word boundaries, so a listed
//   word only matches as a complete token ("classic" is never flagged by a
//   list containing "ass").
// - Chinese: plain substring containment of multi-character phrases.
//
// The first match wins, so text matching both lexicons reports English.

use super::moderation_models::{Lexicon, ModerationVerdict};
use super::wordlists;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Invalid lexicon pattern: {0}")]
    Pattern(String),
}

/// Bilingual lexical profanity filter. Stateless after construction.
pub struct ProfanityFilter {
    /// Compiled whole-word pattern over the English list, None when empty
    en_pattern: Option<Regex>,
    cn_phrases: Vec<String>,
}

impl ProfanityFilter {
    /// Filter over the built-in bilingual lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(wordlists::EN_WORDS, wordlists::CN_PHRASES)
            .expect("built-in lexicon must compile")
    }

    /// Filter over caller-supplied word/phrase lists.
    ///
    /// Words are regex-escaped, so the lists are free text; only an empty
    /// alternation is rejected by construction (an empty English list simply
    /// disables the English check).
    pub fn with_lexicon<E, C>(en_words: E, cn_phrases: C) -> Result<Self, LexiconError>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let escaped: Vec<String> = en_words
            .into_iter()
            .map(|w| regex::escape(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        let en_pattern = if escaped.is_empty() {
            None
        } else {
            let pattern = format!(r"\b(?:{})\b", escaped.join("|"));
            Some(
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| LexiconError::Pattern(e.to_string()))?,
            )
        };

        Ok(Self {
            en_pattern,
            cn_phrases: cn_phrases
                .into_iter()
                .map(|p| p.as_ref().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        })
    }

    /// Scan `text` and report whether it contains disallowed language.
    /// Empty text is never flagged.
    pub fn check(&self, text: &str) -> ModerationVerdict {
        if text.is_empty() {
            return ModerationVerdict::clean();
        }

        if let Some(pattern) = &self.en_pattern {
            if pattern.is_match(text) {
                return ModerationVerdict::flagged(Lexicon::English);
            }
        }

        for phrase in &self.cn_phrases {
            if text.contains(phrase.as_str()) {
                return ModerationVerdict::flagged(Lexicon::Chinese);
            }
        }

        ModerationVerdict::clean()
    }
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new()
    }
}
