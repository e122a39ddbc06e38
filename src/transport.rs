//! HTTP transport for the interpretation client.
//!
//! Owns the connection pool; everything above it works in terms of URLs and bytes.

pub mod http;

pub use http::{HttpReply, HttpTransport, TransportConfig, TransportError};
