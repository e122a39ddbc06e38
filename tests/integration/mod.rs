//! Integration tests with mock HTTP server

pub mod mock_server;
pub mod retry_fallback;
