//! Admin response types.
//!
//! Every response has a meaningful default: an empty lookup, an empty list,
//! a bare acknowledgement, or `balance_ran = false`. A failed call returns
//! the default (or whatever was set before the failure).

use serde::{Deserialize, Serialize};

use crate::model::GroupInfo;

/// Result of a single-group lookup. `group` is `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfoResponse {
    pub group: Option<GroupInfo>,
}

pub type GetGroupResponse = GroupInfoResponse;
pub type GetGroupOfTableResponse = GroupInfoResponse;
pub type GetGroupOfServerResponse = GroupInfoResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListGroupsResponse {
    pub groups: Vec<GroupInfo>,
}

/// Acknowledgement for commands without a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {}

pub type AddGroupResponse = Ack;
pub type RemoveGroupResponse = Ack;
pub type MoveServersResponse = Ack;
pub type MoveTablesResponse = Ack;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceGroupResponse {
    pub balance_ran: bool,
}
