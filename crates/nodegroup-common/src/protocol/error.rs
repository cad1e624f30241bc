use thiserror::Error;

use super::jsonrpc::{
    JsonRpcError, CONFIGURATION_ERROR, CONSTRAINT_VIOLATION, INVALID_PARAMS, NOT_FOUND,
    SERVER_ERROR, UNAUTHORIZED,
};

#[derive(Error, Debug)]
pub enum GroupAdminError {
    /// Startup precondition failed; the endpoint does not come up.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Aborts the host operation that triggered it.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Coordinator error: {0}")]
    Coordinator(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GroupAdminError {
    /// JSON-RPC error code reported for this error.
    pub fn code(&self) -> i32 {
        match self {
            GroupAdminError::Configuration(_) => CONFIGURATION_ERROR,
            GroupAdminError::NotFound(_) => NOT_FOUND,
            GroupAdminError::ConstraintViolation(_) => CONSTRAINT_VIOLATION,
            GroupAdminError::InvalidRequest(_) | GroupAdminError::JsonSerialization(_) => {
                INVALID_PARAMS
            }
            GroupAdminError::Unauthorized(_) => UNAUTHORIZED,
            GroupAdminError::Coordinator(_)
            | GroupAdminError::Transport(_)
            | GroupAdminError::Timeout(_)
            | GroupAdminError::Io(_) => SERVER_ERROR,
        }
    }

    /// Converts to a JSON-RPC error object carrying `data` as the payload.
    pub fn to_jsonrpc(&self, data: Option<serde_json::Value>) -> JsonRpcError {
        JsonRpcError {
            code: self.code(),
            message: self.to_string(),
            data,
        }
    }

    /// Rebuilds a typed error from a JSON-RPC error received over the wire.
    ///
    /// The server-side display prefix is stripped so the rebuilt error
    /// displays the same as the original.
    pub fn from_jsonrpc(error: &JsonRpcError) -> Self {
        let message = |prefixes: &[&str]| {
            prefixes
                .iter()
                .find_map(|p| error.message.strip_prefix(p))
                .unwrap_or(&error.message)
                .to_string()
        };
        match error.code {
            NOT_FOUND => GroupAdminError::NotFound(message(&["Not found: "])),
            CONSTRAINT_VIOLATION => {
                GroupAdminError::ConstraintViolation(message(&["Constraint violation: "]))
            }
            CONFIGURATION_ERROR => {
                GroupAdminError::Configuration(message(&["Configuration error: "]))
            }
            INVALID_PARAMS => GroupAdminError::InvalidRequest(message(&[
                "Invalid request: ",
                "JSON serialization error: ",
            ])),
            UNAUTHORIZED => GroupAdminError::Unauthorized(message(&["Unauthorized: "])),
            _ => GroupAdminError::Coordinator(message(&["Coordinator error: "])),
        }
    }
}

pub type Result<T> = std::result::Result<T, GroupAdminError>;
