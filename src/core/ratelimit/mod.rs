// Core rate limit module - sliding-window ledger of past submissions.

pub mod ledger_service;

pub use ledger_service::*;
