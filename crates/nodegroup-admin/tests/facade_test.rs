//! Admin facade tests against a recording coordinator.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::{addr, FakeCoordinator, FlakyDirectory};
use nodegroup_admin::{AdminFacade, CallController, DirectoryCoordinator, GroupAdminCoordinator};
use nodegroup_common::config::HostConfig;
use nodegroup_common::model::{GroupInfo, TableName, DEFAULT_GROUP};
use nodegroup_common::protocol::{
    AddGroupRequest, BalanceGroupRequest, GetGroupOfServerRequest, GetGroupOfTableRequest,
    GetGroupRequest, GroupAdminError, ListGroupsRequest, MoveServersRequest, MoveTablesRequest,
    RemoveGroupRequest, ServerName,
};

fn facade_over(coordinator: Arc<FakeCoordinator>) -> AdminFacade {
    AdminFacade::new(coordinator)
}

#[test]
fn test_each_operation_makes_exactly_one_coordinator_call() {
    let coordinator = Arc::new(FakeCoordinator::new());
    let facade = facade_over(Arc::clone(&coordinator));
    let mut c = CallController::new();

    facade.get_group(&mut c, GetGroupRequest { group_name: "g".into() });
    facade.get_group_of_table(&mut c, GetGroupOfTableRequest { table_name: "ns:t".into() });
    facade.get_group_of_server(&mut c, GetGroupOfServerRequest { server: ServerName::new("rs", 1) });
    facade.list_groups(&mut c, ListGroupsRequest::default());
    facade.add_group(&mut c, AddGroupRequest { group_name: "g".into() });
    facade.remove_group(&mut c, RemoveGroupRequest { group_name: "g".into() });
    facade.move_servers(
        &mut c,
        MoveServersRequest {
            servers: vec![ServerName::new("rs", 1), ServerName::new("rs", 2)],
            target_group: "g".into(),
        },
    );
    facade.move_tables(
        &mut c,
        MoveTablesRequest {
            table_names: vec!["ns:a".into(), "ns:b".into(), "ns:a".into()],
            target_group: "g".into(),
        },
    );
    facade.balance_group(&mut c, BalanceGroupRequest { group_name: "g".into() });

    assert!(!c.failed());
    assert_eq!(
        coordinator.calls(),
        vec![
            "get_group:g",
            "get_group_of_table:ns:t",
            "get_group_of_server:rs:1",
            "list_groups",
            "add_group:g",
            "remove_group:g",
            "move_servers:2:g",
            "move_tables:2:g",
            "balance_group:g",
        ]
    );
}

#[test]
fn test_lookup_results_are_returned() {
    let mut group = GroupInfo::new("g1");
    group.add_server(addr(1));
    group.add_table(TableName::new("ns", "t"));
    let coordinator = Arc::new(FakeCoordinator::new().with_group(group.clone()));
    coordinator.set_balance_result(true);
    let facade = facade_over(coordinator);
    let mut c = CallController::new();

    let by_table = facade.get_group_of_table(&mut c, GetGroupOfTableRequest { table_name: "ns:t".into() });
    assert_eq!(by_table.group, Some(group.clone()));

    let by_server =
        facade.get_group_of_server(&mut c, GetGroupOfServerRequest { server: ServerName::new("rs", 1) });
    assert_eq!(by_server.group, Some(group.clone()));

    let all = facade.list_groups(&mut c, ListGroupsRequest::default());
    assert_eq!(all.groups, vec![group]);

    let balanced = facade.balance_group(&mut c, BalanceGroupRequest { group_name: "g1".into() });
    assert!(balanced.balance_ran);
    assert!(!c.failed());
}

#[test]
fn test_coordinator_failure_is_reported_with_default_response() {
    let coordinator = Arc::new(FakeCoordinator::new().with_group(GroupInfo::new("g1")));
    coordinator.set_balance_result(true);
    coordinator.fail_with("directory offline");
    let facade = facade_over(coordinator);

    let mut c = CallController::new();
    let response = facade.get_group(&mut c, GetGroupRequest { group_name: "g1".into() });
    assert!(response.group.is_none());
    assert!(matches!(c.failure(), Some(GroupAdminError::Coordinator(_))));

    let mut c = CallController::new();
    let response = facade.list_groups(&mut c, ListGroupsRequest::default());
    assert!(response.groups.is_empty());
    assert!(c.failed());

    let mut c = CallController::new();
    let response = facade.balance_group(&mut c, BalanceGroupRequest { group_name: "g1".into() });
    assert!(!response.balance_ran);
    assert!(c.failed());

    let mut c = CallController::new();
    facade.add_group(&mut c, AddGroupRequest { group_name: "g2".into() });
    assert!(c.failed());
}

#[test]
fn test_decode_failure_skips_coordinator() {
    let coordinator = Arc::new(FakeCoordinator::new());
    let facade = facade_over(Arc::clone(&coordinator));

    let mut c = CallController::new();
    facade.move_tables(
        &mut c,
        MoveTablesRequest {
            table_names: vec!["ns:ok".into(), "bad name".into()],
            target_group: "g".into(),
        },
    );
    assert!(matches!(c.failure(), Some(GroupAdminError::InvalidRequest(_))));

    let mut c = CallController::new();
    facade.get_group_of_server(&mut c, GetGroupOfServerRequest { server: ServerName::new("", 1) });
    assert!(matches!(c.failure(), Some(GroupAdminError::InvalidRequest(_))));

    assert!(coordinator.calls().is_empty());
}

#[test]
fn test_move_servers_is_all_or_nothing_under_directory_failure() {
    let directory = Arc::new(FlakyDirectory::new(vec![addr(1), addr(2), addr(3)]));
    let coordinator = DirectoryCoordinator::new(directory.clone(), HostConfig::new());
    coordinator.initialize().unwrap();
    coordinator.add_group("G").unwrap();
    let facade = AdminFacade::new(Arc::new(coordinator));

    directory.set_fail_commits(true);
    let mut c = CallController::new();
    facade.move_servers(
        &mut c,
        MoveServersRequest {
            servers: vec![ServerName::new("rs", 1), ServerName::new("rs", 2)],
            target_group: "G".into(),
        },
    );
    assert!(c.failed());

    let mut c = CallController::new();
    for port in [1, 2] {
        let response =
            facade.get_group_of_server(&mut c, GetGroupOfServerRequest { server: ServerName::new("rs", port) });
        assert_eq!(response.group.unwrap().name, DEFAULT_GROUP);
    }

    directory.set_fail_commits(false);
    facade.move_servers(
        &mut c,
        MoveServersRequest {
            servers: vec![ServerName::new("rs", 1), ServerName::new("rs", 2)],
            target_group: "G".into(),
        },
    );
    assert!(!c.failed());
    let group = facade
        .get_group(&mut c, GetGroupRequest { group_name: "G".into() })
        .group
        .unwrap();
    assert_eq!(group.servers, BTreeSet::from([addr(1), addr(2)]));
}

#[test]
fn test_move_tables_is_all_or_nothing_under_directory_failure() {
    let directory = Arc::new(FlakyDirectory::new(vec![]));
    let coordinator = DirectoryCoordinator::new(directory.clone(), HostConfig::new());
    coordinator.initialize().unwrap();
    coordinator.add_group("G").unwrap();
    coordinator
        .move_tables(&BTreeSet::from([TableName::new("ns", "a")]), DEFAULT_GROUP)
        .unwrap();
    let facade = AdminFacade::new(Arc::new(coordinator));

    directory.set_fail_commits(true);
    let mut c = CallController::new();
    facade.move_tables(
        &mut c,
        MoveTablesRequest {
            table_names: vec!["ns:a".into(), "ns:b".into()],
            target_group: "G".into(),
        },
    );
    assert!(c.failed());

    let mut c = CallController::new();
    let a = facade.get_group_of_table(&mut c, GetGroupOfTableRequest { table_name: "ns:a".into() });
    assert_eq!(a.group.unwrap().name, DEFAULT_GROUP);
    let b = facade.get_group_of_table(&mut c, GetGroupOfTableRequest { table_name: "ns:b".into() });
    assert!(b.group.is_none());
}

#[test]
fn test_moving_current_members_skips_the_directory() {
    let directory = Arc::new(FlakyDirectory::new(vec![addr(1), addr(2)]));
    let coordinator = DirectoryCoordinator::new(directory.clone(), HostConfig::new());
    coordinator.initialize().unwrap();
    coordinator.add_group("G").unwrap();
    let orders = TableName::new("sales", "orders");
    coordinator
        .move_servers(&BTreeSet::from([addr(1)]), "G")
        .unwrap();
    coordinator
        .move_tables(&BTreeSet::from([orders.clone()]), "G")
        .unwrap();

    directory.set_fail_commits(true);
    coordinator
        .move_servers(&BTreeSet::from([addr(1)]), "G")
        .unwrap();
    coordinator
        .move_tables(&BTreeSet::from([orders.clone()]), "G")
        .unwrap();
    assert!(matches!(
        coordinator.move_servers(&BTreeSet::from([addr(1), addr(2)]), "G"),
        Err(GroupAdminError::Coordinator(_))
    ));

    let group = coordinator.get_group("G").unwrap().unwrap();
    assert_eq!(group.servers, BTreeSet::from([addr(1)]));
    assert!(group.contains_table(&orders));
}
