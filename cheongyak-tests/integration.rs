//! Integration tests for Cheongyak
//!
//! These tests run the API server with the production 청약홈 provider pointed
//! at a local stub of the upstream service.

#[path = "integration/stub_upstream.rs"]
mod stub_upstream;

#[path = "integration/detail_lookup.rs"]
mod detail_lookup;
