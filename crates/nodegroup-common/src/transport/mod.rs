//! HTTP transport helpers for the JSON-RPC admin protocol.

pub mod http;

pub use http::{HttpTransport, HyperResponse};
