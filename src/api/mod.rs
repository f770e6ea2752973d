//! Race Scorer HTTP server module
//!
//! Serves the scoring page plus the upload/download endpoints.
//! Run with `race-scorer serve` or `race-scorer-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
