//! HTTP Server for the Admin Endpoint
//!
//! Routes:
//! - `POST /` - JSON-RPC admin commands
//! - `POST /events` - host mutation events (standalone mode only)
//! - `GET /__health` - liveness

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hyper::body::Bytes;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use nodegroup_common::auth::{AuthConfig, API_KEY_HEADER};
use nodegroup_common::protocol::error::{GroupAdminError, Result};
use nodegroup_common::protocol::{JsonRpcError, JsonRpcResponse};
use nodegroup_common::transport::HttpTransport;

use crate::endpoint::GroupAdminEndpoint;
use crate::events::{apply_event, ClusterEvent};
use crate::host::StandaloneHost;
use crate::http_router::AdminRouter;
use crate::observer::MasterObserver;

/// Host and observer that `POST /events` drives.
struct EventBridge {
    host: Arc<StandaloneHost>,
    observer: Arc<dyn MasterObserver>,
}

#[derive(Clone)]
struct AppState {
    router: Arc<AdminRouter>,
    auth: AuthConfig,
    events: Option<Arc<EventBridge>>,
}

/// HTTP server for one admin endpoint.
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    pub fn new(endpoint: &GroupAdminEndpoint) -> Self {
        Self {
            state: AppState {
                router: Arc::new(AdminRouter::new(endpoint.facade())),
                auth: AuthConfig::disabled(),
                events: None,
            },
        }
    }

    /// Requires the `X-API-Key` header on every non-health route.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.state.auth = auth;
        self
    }

    /// Enables `POST /events`, running events through `observer` against
    /// `host`.
    pub fn with_events(
        mut self,
        host: Arc<StandaloneHost>,
        observer: Arc<dyn MasterObserver>,
    ) -> Self {
        self.state.events = Some(Arc::new(EventBridge { host, observer }));
        self
    }

    pub fn into_router(self) -> axum::Router {
        axum::Router::new()
            .route("/", axum::routing::post(handle_jsonrpc))
            .route("/events", axum::routing::post(handle_event))
            .route("/__health", axum::routing::get(health_check))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state)
    }

    /// Binds `addr` and serves until the process exits.
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GroupAdminError::Transport(format!("Failed to bind to {}: {}", addr, e)))?;
        self.serve(listener).await
    }

    /// Serves on an already-bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local = listener
            .local_addr()
            .map_err(|e| GroupAdminError::Transport(format!("Failed to get local addr: {}", e)))?;
        info!(
            "Group admin HTTP server listening on {} (auth: {})",
            local, self.state.auth
        );

        axum::serve(listener, self.into_router())
            .await
            .map_err(|e| GroupAdminError::Transport(format!("Server error: {}", e)))
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    state.auth.authorize(provided).inspect_err(|e| {
        warn!("Rejected unauthenticated request: {}", e);
    })
}

async fn handle_jsonrpc(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(e) = authorize(&state, &headers) {
        return HttpTransport::to_http_response_with_status(
            JsonRpcResponse::error(Value::Null, e.to_jsonrpc(None)),
            StatusCode::UNAUTHORIZED,
        )
        .into_response();
    }

    let request = match HttpTransport::parse_jsonrpc(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Invalid JSON-RPC body: {}", e);
            return HttpTransport::to_http_error(Value::Null, JsonRpcError::parse_error())
                .into_response();
        }
    };

    HttpTransport::to_http_response(state.router.handle_request(request).await).into_response()
}

async fn handle_event(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(e) = authorize(&state, &headers) {
        return error_body(StatusCode::UNAUTHORIZED, &e.to_string());
    }
    let Some(bridge) = state.events.clone() else {
        return error_body(StatusCode::NOT_FOUND, "event intake is not enabled");
    };
    let event: ClusterEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => return error_body(StatusCode::BAD_REQUEST, &format!("Invalid event: {}", e)),
    };

    let outcome = tokio::task::spawn_blocking(move || {
        apply_event(&bridge.host, bridge.observer.as_ref(), &event)
    })
    .await;

    match outcome {
        Ok(Ok(())) => (StatusCode::OK, Json(json!({"status": "ok"}))).into_response(),
        Ok(Err(e)) => error_body(event_status(&e), &e.to_string()),
        Err(e) => error_body(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn event_status(error: &GroupAdminError) -> StatusCode {
    match error {
        GroupAdminError::ConstraintViolation(_) => StatusCode::CONFLICT,
        GroupAdminError::NotFound(_) => StatusCode::NOT_FOUND,
        GroupAdminError::InvalidRequest(_) | GroupAdminError::JsonSerialization(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
