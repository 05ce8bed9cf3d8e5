// Core moderation module - bilingual lexical profanity filtering.
// Pure text checks: no storage, no transport, no async.

pub mod moderation_models;
pub mod moderation_service;
pub mod wordlists;

pub use moderation_models::*;
pub use moderation_service::*;
