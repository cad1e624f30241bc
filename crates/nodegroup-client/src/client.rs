use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use nodegroup_common::auth::API_KEY_HEADER;
use nodegroup_common::model::{Address, GroupInfo, TableName};
use nodegroup_common::protocol::error::{GroupAdminError, Result};
use nodegroup_common::protocol::{
    AddGroupRequest, AdminMethod, BalanceGroupRequest, BalanceGroupResponse,
    GetGroupOfServerRequest, GetGroupOfTableRequest, GetGroupRequest, GroupInfoResponse,
    ListGroupsRequest, ListGroupsResponse, MoveServersRequest, MoveTablesRequest,
    RemoveGroupRequest, ServerName,
};
use nodegroup_common::transport::HttpTransport;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC client for the group admin endpoint.
///
/// Failed calls come back as the same [`GroupAdminError`] variant the server
/// reported.
pub struct GroupAdminClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    next_id: AtomicU64,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl GroupAdminClient {
    /// Creates a client for `base_url` (e.g. `http://127.0.0.1:16010`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") {
            return Err(GroupAdminError::InvalidRequest(format!(
                "Admin URL must start with http://, got '{}'",
                base_url
            )));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            next_id: AtomicU64::new(1),
            client: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one JSON-RPC call and returns its `result`.
    pub async fn call(&self, method: AdminMethod, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = HttpTransport::build_request(method.as_str(), params, Value::from(id));
        let body = serde_json::to_vec(&request)?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/", self.base_url))
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        let http_request = builder
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| GroupAdminError::Transport(format!("Failed to build request: {}", e)))?;

        debug!("Calling {} on {}", method, self.base_url);
        let response = tokio::time::timeout(self.timeout, self.client.request(http_request))
            .await
            .map_err(|_| GroupAdminError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| GroupAdminError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| GroupAdminError::Transport(format!("Failed to read response: {}", e)))?
            .to_bytes();

        let jsonrpc = match HttpTransport::parse_jsonrpc_response(&bytes) {
            Ok(jsonrpc) => jsonrpc,
            Err(_) if status == StatusCode::UNAUTHORIZED => {
                return Err(GroupAdminError::Unauthorized("server rejected the API key".into()))
            }
            Err(e) if !status.is_success() => {
                return Err(GroupAdminError::Transport(format!("HTTP {}: {}", status, e)))
            }
            Err(e) => return Err(e),
        };

        if let Some(error) = jsonrpc.error {
            return Err(GroupAdminError::from_jsonrpc(&error));
        }
        jsonrpc.result.ok_or_else(|| {
            GroupAdminError::Transport("Missing result in success response".to_string())
        })
    }

    async fn call_typed<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        method: AdminMethod,
        request: &Req,
    ) -> Result<Resp> {
        let result = self.call(method, serde_json::to_value(request)?).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn get_group(&self, name: &str) -> Result<Option<GroupInfo>> {
        let request = GetGroupRequest {
            group_name: name.to_string(),
        };
        let response: GroupInfoResponse = self.call_typed(AdminMethod::GetGroup, &request).await?;
        Ok(response.group)
    }

    pub async fn get_group_of_table(&self, table: &TableName) -> Result<Option<GroupInfo>> {
        let request = GetGroupOfTableRequest {
            table_name: table.to_string(),
        };
        let response: GroupInfoResponse =
            self.call_typed(AdminMethod::GetGroupOfTable, &request).await?;
        Ok(response.group)
    }

    pub async fn get_group_of_server(&self, server: &Address) -> Result<Option<GroupInfo>> {
        let request = GetGroupOfServerRequest {
            server: ServerName::from(server),
        };
        let response: GroupInfoResponse =
            self.call_typed(AdminMethod::GetGroupOfServer, &request).await?;
        Ok(response.group)
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        let response: ListGroupsResponse = self
            .call_typed(AdminMethod::ListGroups, &ListGroupsRequest::default())
            .await?;
        Ok(response.groups)
    }

    pub async fn add_group(&self, name: &str) -> Result<()> {
        let request = AddGroupRequest {
            group_name: name.to_string(),
        };
        self.call(AdminMethod::AddGroup, serde_json::to_value(&request)?)
            .await
            .map(|_| ())
    }

    pub async fn remove_group(&self, name: &str) -> Result<()> {
        let request = RemoveGroupRequest {
            group_name: name.to_string(),
        };
        self.call(AdminMethod::RemoveGroup, serde_json::to_value(&request)?)
            .await
            .map(|_| ())
    }

    pub async fn move_servers(&self, servers: &[Address], target_group: &str) -> Result<()> {
        let request = MoveServersRequest {
            servers: servers.iter().map(ServerName::from).collect(),
            target_group: target_group.to_string(),
        };
        self.call(AdminMethod::MoveServers, serde_json::to_value(&request)?)
            .await
            .map(|_| ())
    }

    pub async fn move_tables(&self, tables: &[TableName], target_group: &str) -> Result<()> {
        let request = MoveTablesRequest {
            table_names: tables.iter().map(TableName::to_string).collect(),
            target_group: target_group.to_string(),
        };
        self.call(AdminMethod::MoveTables, serde_json::to_value(&request)?)
            .await
            .map(|_| ())
    }

    /// Returns whether a rebalance actually ran.
    pub async fn balance_group(&self, name: &str) -> Result<bool> {
        let request = BalanceGroupRequest {
            group_name: name.to_string(),
        };
        let response: BalanceGroupResponse =
            self.call_typed(AdminMethod::BalanceGroup, &request).await?;
        Ok(response.balance_ran)
    }
}
