//! Shared server plumbing: configuration, application state and the
//! catch-all error type of the HTTP handlers.

#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod state;

pub use config::Config;
pub use state::AppState;
