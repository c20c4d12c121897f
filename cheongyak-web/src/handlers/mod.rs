//! HTTP request handlers organized by functionality

pub mod api;

// Re-export handler functions
pub use api::api_bunyanggwon_detail;
