//! Cheongyak Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Proxies bunyanggwon detail lookups to the 청약홈 API for the mobile client
//! and answers with a uniform JSON envelope.

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, build_router, run_server};
