// Core comments module - comment data model and the two-level thread view.

pub mod comment_models;
pub mod thread_view;

pub use comment_models::*;
pub use thread_view::*;
