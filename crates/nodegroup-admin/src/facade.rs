//! Admin command facade.
//!
//! One method per admin command. Each decodes its request, makes exactly one
//! coordinator call and fills in the response. Errors never escape: they are
//! recorded on the [`CallController`] and the response is returned in its
//! last-set state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use nodegroup_common::model::{Address, TableName};
use nodegroup_common::protocol::error::Result;
use nodegroup_common::protocol::{
    AddGroupRequest, AddGroupResponse, AdminMethod, BalanceGroupRequest, BalanceGroupResponse,
    GetGroupOfServerRequest, GetGroupOfServerResponse, GetGroupOfTableRequest,
    GetGroupOfTableResponse, GetGroupRequest, GetGroupResponse, ListGroupsRequest,
    ListGroupsResponse, MoveServersRequest, MoveServersResponse, MoveTablesRequest,
    MoveTablesResponse, RemoveGroupRequest, RemoveGroupResponse,
};

use crate::controller::CallController;
use crate::coordinator::GroupAdminCoordinator;

pub struct AdminFacade {
    coordinator: Arc<dyn GroupAdminCoordinator>,
}

impl AdminFacade {
    pub fn new(coordinator: Arc<dyn GroupAdminCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn get_group(
        &self,
        controller: &mut CallController,
        request: GetGroupRequest,
    ) -> GetGroupResponse {
        let mut response = GetGroupResponse::default();
        let result = self.coordinator.get_group(&request.group_name);
        if let Some(group) = report(controller, AdminMethod::GetGroup, result) {
            response.group = group;
        }
        response
    }

    pub fn get_group_of_table(
        &self,
        controller: &mut CallController,
        request: GetGroupOfTableRequest,
    ) -> GetGroupOfTableResponse {
        let mut response = GetGroupOfTableResponse::default();
        let result = request
            .table_name
            .parse::<TableName>()
            .and_then(|table| self.coordinator.get_group_of_table(&table));
        if let Some(group) = report(controller, AdminMethod::GetGroupOfTable, result) {
            response.group = group;
        }
        response
    }

    pub fn get_group_of_server(
        &self,
        controller: &mut CallController,
        request: GetGroupOfServerRequest,
    ) -> GetGroupOfServerResponse {
        let mut response = GetGroupOfServerResponse::default();
        let result = request
            .server
            .to_address()
            .and_then(|server| self.coordinator.get_group_of_server(&server));
        if let Some(group) = report(controller, AdminMethod::GetGroupOfServer, result) {
            response.group = group;
        }
        response
    }

    pub fn list_groups(
        &self,
        controller: &mut CallController,
        _request: ListGroupsRequest,
    ) -> ListGroupsResponse {
        let mut response = ListGroupsResponse::default();
        let result = self.coordinator.list_groups();
        if let Some(groups) = report(controller, AdminMethod::ListGroups, result) {
            response.groups = groups;
        }
        response
    }

    pub fn add_group(
        &self,
        controller: &mut CallController,
        request: AddGroupRequest,
    ) -> AddGroupResponse {
        let result = self.coordinator.add_group(&request.group_name);
        report(controller, AdminMethod::AddGroup, result);
        AddGroupResponse::default()
    }

    pub fn remove_group(
        &self,
        controller: &mut CallController,
        request: RemoveGroupRequest,
    ) -> RemoveGroupResponse {
        let result = self.coordinator.remove_group(&request.group_name);
        report(controller, AdminMethod::RemoveGroup, result);
        RemoveGroupResponse::default()
    }

    pub fn move_servers(
        &self,
        controller: &mut CallController,
        request: MoveServersRequest,
    ) -> MoveServersResponse {
        let result = request
            .servers
            .iter()
            .map(|server| server.to_address())
            .collect::<Result<BTreeSet<Address>>>()
            .and_then(|servers| self.coordinator.move_servers(&servers, &request.target_group));
        report(controller, AdminMethod::MoveServers, result);
        MoveServersResponse::default()
    }

    pub fn move_tables(
        &self,
        controller: &mut CallController,
        request: MoveTablesRequest,
    ) -> MoveTablesResponse {
        let result = request
            .table_names
            .iter()
            .map(|name| name.parse::<TableName>())
            .collect::<Result<BTreeSet<TableName>>>()
            .and_then(|tables| self.coordinator.move_tables(&tables, &request.target_group));
        report(controller, AdminMethod::MoveTables, result);
        MoveTablesResponse::default()
    }

    pub fn balance_group(
        &self,
        controller: &mut CallController,
        request: BalanceGroupRequest,
    ) -> BalanceGroupResponse {
        let mut response = BalanceGroupResponse::default();
        let result = self.coordinator.balance_group(&request.group_name);
        response.balance_ran = report(controller, AdminMethod::BalanceGroup, result).unwrap_or(false);
        response
    }

    /// Runs `method` with JSON params and returns the JSON response payload.
    ///
    /// Params that do not decode into the method's request type are reported
    /// on the controller and answered with the default payload.
    pub fn dispatch(
        &self,
        controller: &mut CallController,
        method: AdminMethod,
        params: Value,
    ) -> Value {
        debug!("Dispatching admin call {}", method);
        match method {
            AdminMethod::GetGroup => self.invoke(controller, method, params, Self::get_group),
            AdminMethod::GetGroupOfTable => {
                self.invoke(controller, method, params, Self::get_group_of_table)
            }
            AdminMethod::GetGroupOfServer => {
                self.invoke(controller, method, params, Self::get_group_of_server)
            }
            AdminMethod::ListGroups => self.invoke(controller, method, params, Self::list_groups),
            AdminMethod::AddGroup => self.invoke(controller, method, params, Self::add_group),
            AdminMethod::RemoveGroup => self.invoke(controller, method, params, Self::remove_group),
            AdminMethod::MoveServers => self.invoke(controller, method, params, Self::move_servers),
            AdminMethod::MoveTables => self.invoke(controller, method, params, Self::move_tables),
            AdminMethod::BalanceGroup => {
                self.invoke(controller, method, params, Self::balance_group)
            }
        }
    }

    fn invoke<Req, Resp>(
        &self,
        controller: &mut CallController,
        method: AdminMethod,
        params: Value,
        op: fn(&Self, &mut CallController, Req) -> Resp,
    ) -> Value
    where
        Req: DeserializeOwned,
        Resp: Serialize + Default,
    {
        // `list_groups` takes no arguments; accept a missing params field.
        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        let response = match serde_json::from_value::<Req>(params) {
            Ok(request) => op(self, controller, request),
            Err(e) => {
                report::<()>(controller, method, Err(e.into()));
                Resp::default()
            }
        };
        serde_json::to_value(response).unwrap_or_default()
    }
}

/// Unwraps a successful result, or records the failure and returns `None`.
fn report<T>(controller: &mut CallController, method: AdminMethod, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Admin call {} failed: {}", method, e);
            controller.set_failed(e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegroup_common::config::HostConfig;
    use nodegroup_common::model::DEFAULT_GROUP;
    use nodegroup_common::protocol::{GroupAdminError, ServerName};
    use serde_json::json;

    use crate::coordinator::DirectoryCoordinator;
    use crate::directory::InMemoryGroupDirectory;

    fn facade() -> AdminFacade {
        let dir = Arc::new(InMemoryGroupDirectory::new(vec![
            Address::from_parts("rs", 1),
            Address::from_parts("rs", 2),
        ]));
        let coordinator = DirectoryCoordinator::new(dir, HostConfig::new());
        coordinator.initialize().unwrap();
        AdminFacade::new(Arc::new(coordinator))
    }

    #[test]
    fn test_get_missing_group_is_empty_not_error() {
        let facade = facade();
        let mut controller = CallController::new();
        let response = facade.get_group(
            &mut controller,
            GetGroupRequest {
                group_name: "nope".into(),
            },
        );
        assert!(response.group.is_none());
        assert!(!controller.failed());
    }

    #[test]
    fn test_add_then_get_group() {
        let facade = facade();
        let mut controller = CallController::new();
        facade.add_group(&mut controller, AddGroupRequest { group_name: "g1".into() });
        let response = facade.get_group(&mut controller, GetGroupRequest { group_name: "g1".into() });
        assert!(!controller.failed());

        let group = response.group.unwrap();
        assert_eq!(group.name, "g1");
        assert!(group.is_empty());
    }

    #[test]
    fn test_bad_table_name_is_reported() {
        let facade = facade();
        let mut controller = CallController::new();
        let response = facade.get_group_of_table(
            &mut controller,
            GetGroupOfTableRequest {
                table_name: "a:b:c".into(),
            },
        );
        assert!(response.group.is_none());
        assert!(matches!(
            controller.failure(),
            Some(GroupAdminError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_move_servers_with_bad_port_moves_nothing() {
        let facade = facade();
        let mut controller = CallController::new();
        facade.add_group(&mut controller, AddGroupRequest { group_name: "g1".into() });
        facade.move_servers(
            &mut controller,
            MoveServersRequest {
                servers: vec![ServerName::new("rs", 1), ServerName::new("rs", 70000)],
                target_group: "g1".into(),
            },
        );
        assert!(controller.failed());

        let mut controller = CallController::new();
        let response = facade.get_group_of_server(
            &mut controller,
            GetGroupOfServerRequest {
                server: ServerName::new("rs", 1),
            },
        );
        assert_eq!(response.group.unwrap().name, DEFAULT_GROUP);
    }

    #[test]
    fn test_balance_failure_reports_false() {
        let facade = facade();
        let mut controller = CallController::new();
        let response = facade.balance_group(
            &mut controller,
            BalanceGroupRequest {
                group_name: "missing".into(),
            },
        );
        assert!(!response.balance_ran);
        assert!(matches!(controller.failure(), Some(GroupAdminError::NotFound(_))));
    }

    #[test]
    fn test_dispatch_decodes_params() {
        let facade = facade();
        let mut controller = CallController::new();
        let payload = facade.dispatch(&mut controller, AdminMethod::ListGroups, Value::Null);
        assert!(!controller.failed());
        assert_eq!(payload["groups"].as_array().unwrap().len(), 1);

        let payload = facade.dispatch(
            &mut controller,
            AdminMethod::GetGroupOfServer,
            json!({"server": {"host_name": "rs", "port": 2}}),
        );
        assert_eq!(payload["group"]["name"], DEFAULT_GROUP);
    }

    #[test]
    fn test_dispatch_bad_params_returns_default_payload() {
        let facade = facade();
        let mut controller = CallController::new();
        let payload = facade.dispatch(
            &mut controller,
            AdminMethod::BalanceGroup,
            json!({"wrong": 1}),
        );
        assert_eq!(payload, json!({"balance_ran": false}));
        assert!(matches!(
            controller.failure(),
            Some(GroupAdminError::JsonSerialization(_))
        ));
    }
}
