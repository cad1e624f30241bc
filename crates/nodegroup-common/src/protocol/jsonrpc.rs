//! JSON-RPC 2.0 Protocol Types
//!
//! The admin endpoint speaks JSON-RPC 2.0 over HTTP.
//!
//! # Error Codes
//!
//! Standard codes:
//! - `-32700`: Parse error
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! Server-defined codes used by the group admin surface:
//! - `-32000`: Coordinator failure
//! - `-32001`: Unauthorized
//! - `-32004`: Group, table or server not found
//! - `-32005`: Constraint violation
//! - `-32006`: Configuration error
//!
//! A reported failure still carries the (possibly default) response payload
//! in `error.data`.
//!
//! # Example
//!
//! ```
//! use nodegroup_common::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JsonRpcError};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest {
//!     jsonrpc: "2.0".into(),
//!     method: "get_group".into(),
//!     params: json!({"group_name": "default"}),
//!     id: json!(1),
//! };
//!
//! let response = JsonRpcResponse::success(json!(1), json!({"group": null}));
//! let error_response = JsonRpcResponse::error(json!(1), JsonRpcError::method_not_found());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Name of the method to invoke
    pub method: String,
    /// Parameter values
    #[serde(default)]
    pub params: Value,
    /// Request identifier (number, string, or null)
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Result value on success (None if error is present)
    pub result: Option<Value>,
    /// Error object on failure (None if result is present)
    pub error: Option<JsonRpcError>,
    /// Request identifier (must match the request id)
    pub id: Value,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Short description of the error
    pub message: String,
    /// Response payload in its last-set state, when the call was dispatched
    pub data: Option<Value>,
}

/// Invalid JSON was received by the server
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist / is not available
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameter(s)
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error
pub const INTERNAL_ERROR: i32 = -32603;
/// Failure reported by the group coordinator
pub const SERVER_ERROR: i32 = -32000;
/// Missing or wrong API key
pub const UNAUTHORIZED: i32 = -32001;
/// Referenced group, table or server does not exist
pub const NOT_FOUND: i32 = -32004;
/// Operation would break a group invariant
pub const CONSTRAINT_VIOLATION: i32 = -32005;
/// Endpoint configuration is unusable
pub const CONFIGURATION_ERROR: i32 = -32006;

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self {
            code: PARSE_ERROR,
            message: "Parse error".into(),
            data: None,
        }
    }

    pub fn invalid_request() -> Self {
        Self {
            code: INVALID_REQUEST,
            message: "Invalid Request".into(),
            data: None,
        }
    }

    pub fn method_not_found() -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: "Method not found".into(),
            data: None,
        }
    }

    pub fn internal_error(msg: &str) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: msg.into(),
            data: None,
        }
    }

    pub fn server_error(msg: &str) -> Self {
        Self {
            code: SERVER_ERROR,
            message: msg.into(),
            data: None,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }
}
