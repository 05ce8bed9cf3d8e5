// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "comments/mod.rs"]
pub mod comments;

#[path = "ratelimit/mod.rs"]
pub mod ratelimit;
