//! HTTP Router for the Admin Endpoint
//!
//! Maps JSON-RPC requests onto [`AdminFacade`] calls. Facade calls block on
//! the coordinator, so each one runs on tokio's blocking pool.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use nodegroup_common::protocol::{AdminMethod, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

use crate::controller::CallController;
use crate::facade::AdminFacade;

/// JSON-RPC router for the nine admin methods.
///
/// A call the facade reports as failed becomes a JSON-RPC error whose `data`
/// is the response payload as the facade left it.
pub struct AdminRouter {
    facade: Arc<AdminFacade>,
}

impl AdminRouter {
    pub fn new(facade: Arc<AdminFacade>) -> Self {
        Self { facade }
    }

    /// Handles an incoming JSON-RPC request.
    pub async fn handle_request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();

        if req.jsonrpc != "2.0" {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_request());
        }

        let method = match req.method.parse::<AdminMethod>() {
            Ok(method) => method,
            Err(_) => {
                debug!("Unknown admin method '{}'", req.method);
                return JsonRpcResponse::error(id, JsonRpcError::method_not_found());
            }
        };

        let facade = Arc::clone(&self.facade);
        let params = req.params;
        let outcome = tokio::task::spawn_blocking(move || {
            let mut controller = CallController::new();
            let payload = facade.dispatch(&mut controller, method, params);
            (controller, payload)
        })
        .await;

        match outcome {
            Ok((mut controller, payload)) => Self::into_response(id, &mut controller, payload),
            Err(e) => {
                error!("Admin call {} panicked or was cancelled: {}", method, e);
                JsonRpcResponse::error(id, JsonRpcError::internal_error(&e.to_string()))
            }
        }
    }

    fn into_response(id: Value, controller: &mut CallController, payload: Value) -> JsonRpcResponse {
        match controller.take_failure() {
            Some(failure) => JsonRpcResponse::error(id, failure.to_jsonrpc(Some(payload))),
            None => JsonRpcResponse::success(id, payload),
        }
    }
}
