// Core submission module - the anti-abuse gate and the submission pipeline
// that sits between raw form input and the remote comment store.

pub mod submission_models;
pub mod submission_service;

pub use submission_models::*;
pub use submission_service::*;
