// The core module contains all business logic.
// Each feature gets its own submodule; storage and transport only appear
// here as traits that infra implements.

#[path = "comments/mod.rs"]
pub mod comments;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "ratelimit/mod.rs"]
pub mod ratelimit;

#[path = "submission/mod.rs"]
pub mod submission;
