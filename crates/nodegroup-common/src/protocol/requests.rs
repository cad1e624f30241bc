//! Admin request types.
//!
//! Requests carry arguments in their wire form; the admin facade decodes them
//! into model types and reports decoding failures like any other failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::GroupAdminError;
use crate::model::Address;

/// The nine admin commands exposed by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminMethod {
    GetGroup,
    GetGroupOfTable,
    GetGroupOfServer,
    ListGroups,
    AddGroup,
    RemoveGroup,
    MoveServers,
    MoveTables,
    BalanceGroup,
}

impl AdminMethod {
    pub const ALL: [AdminMethod; 9] = [
        AdminMethod::GetGroup,
        AdminMethod::GetGroupOfTable,
        AdminMethod::GetGroupOfServer,
        AdminMethod::ListGroups,
        AdminMethod::AddGroup,
        AdminMethod::RemoveGroup,
        AdminMethod::MoveServers,
        AdminMethod::MoveTables,
        AdminMethod::BalanceGroup,
    ];

    /// JSON-RPC method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminMethod::GetGroup => "get_group",
            AdminMethod::GetGroupOfTable => "get_group_of_table",
            AdminMethod::GetGroupOfServer => "get_group_of_server",
            AdminMethod::ListGroups => "list_groups",
            AdminMethod::AddGroup => "add_group",
            AdminMethod::RemoveGroup => "remove_group",
            AdminMethod::MoveServers => "move_servers",
            AdminMethod::MoveTables => "move_tables",
            AdminMethod::BalanceGroup => "balance_group",
        }
    }
}

impl fmt::Display for AdminMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminMethod {
    type Err = GroupAdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| GroupAdminError::InvalidRequest(format!("Unknown admin method '{}'", s)))
    }
}

/// A server as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerName {
    pub host_name: String,
    pub port: u32,
}

impl ServerName {
    pub fn new(host_name: impl Into<String>, port: u32) -> Self {
        Self {
            host_name: host_name.into(),
            port,
        }
    }

    /// Decodes into a model address, rejecting empty hosts and out-of-range ports.
    pub fn to_address(&self) -> Result<Address, GroupAdminError> {
        if self.host_name.is_empty() {
            return Err(GroupAdminError::InvalidRequest(
                "Server host name must not be empty".to_string(),
            ));
        }
        let port = u16::try_from(self.port).map_err(|_| {
            GroupAdminError::InvalidRequest(format!(
                "Port {} of server {} is out of range",
                self.port, self.host_name
            ))
        })?;
        Ok(Address::from_parts(self.host_name.clone(), port))
    }
}

impl From<&Address> for ServerName {
    fn from(addr: &Address) -> Self {
        Self::new(addr.host.clone(), u32::from(addr.port))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGroupRequest {
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGroupOfTableRequest {
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGroupOfServerRequest {
    pub server: ServerName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListGroupsRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddGroupRequest {
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveGroupRequest {
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveServersRequest {
    pub servers: Vec<ServerName>,
    pub target_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTablesRequest {
    pub table_names: Vec<String>,
    pub target_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceGroupRequest {
    pub group_name: String,
}
