//! HTTP Transport Utilities
//!
//! Conversions between HTTP bodies and JSON-RPC messages, shared by the
//! admin server and the admin client.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::protocol::error::GroupAdminError;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Type alias for Hyper responses with full body
pub type HyperResponse = Response<Full<Bytes>>;

/// HTTP transport utility functions
pub struct HttpTransport;

impl HttpTransport {
    /// Parse a JSON-RPC request from an HTTP body
    ///
    /// ```
    /// use nodegroup_common::transport::http::HttpTransport;
    /// use hyper::body::Bytes;
    ///
    /// let body = Bytes::from(r#"{"jsonrpc":"2.0","method":"list_groups","params":{},"id":1}"#);
    /// let request = HttpTransport::parse_jsonrpc(body).unwrap();
    /// assert_eq!(request.method, "list_groups");
    /// ```
    pub fn parse_jsonrpc(body: Bytes) -> Result<JsonRpcRequest, GroupAdminError> {
        serde_json::from_slice(&body).map_err(GroupAdminError::JsonSerialization)
    }

    /// Parse a JSON-RPC response from an HTTP body
    pub fn parse_jsonrpc_response(body: &[u8]) -> Result<JsonRpcResponse, GroupAdminError> {
        serde_json::from_slice(body).map_err(GroupAdminError::JsonSerialization)
    }

    /// Create an HTTP response from a JSON-RPC response
    pub fn to_http_response(jsonrpc: JsonRpcResponse) -> HyperResponse {
        Self::to_http_response_with_status(jsonrpc, StatusCode::OK)
    }

    /// Create an HTTP error response from a JSON-RPC error
    pub fn to_http_error(id: serde_json::Value, error: JsonRpcError) -> HyperResponse {
        Self::to_http_response(JsonRpcResponse::error(id, error))
    }

    /// Build a JSON-RPC request
    pub fn build_request(
        method: &str,
        params: serde_json::Value,
        id: serde_json::Value,
    ) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Create an HTTP response with a custom status code
    pub fn to_http_response_with_status(jsonrpc: JsonRpcResponse, status: StatusCode) -> HyperResponse {
        let body = serde_json::to_vec(&jsonrpc).unwrap_or_default();

        let mut response = Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = status;
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
