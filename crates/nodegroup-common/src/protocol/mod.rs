pub mod error;
pub mod jsonrpc;
pub mod requests;
pub mod responses;


pub use error::{GroupAdminError, Result};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use requests::{
    AddGroupRequest, AdminMethod, BalanceGroupRequest, GetGroupOfServerRequest,
    GetGroupOfTableRequest, GetGroupRequest, ListGroupsRequest, MoveServersRequest,
    MoveTablesRequest, RemoveGroupRequest, ServerName,
};
pub use responses::{
    Ack, AddGroupResponse, BalanceGroupResponse, GetGroupOfServerResponse,
    GetGroupOfTableResponse, GetGroupResponse, GroupInfoResponse, ListGroupsResponse,
    MoveServersResponse, MoveTablesResponse, RemoveGroupResponse,
};
