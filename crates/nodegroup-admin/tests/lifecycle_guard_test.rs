//! Lifecycle hooks driven through the standalone host's event pipeline.

mod common;

use std::sync::Arc;

use common::{addr, group_aware_config};
use nodegroup_admin::{
    apply_event, CallController, ClusterEvent, CoordinatorCell, GroupAdminEndpoint, HostServices,
    StandaloneHost,
};
use nodegroup_common::model::{
    NamespaceDescriptor, TableDescriptor, TableName, NAMESPACE_GROUP_PROP,
};
use nodegroup_common::protocol::{
    AddGroupRequest, GetGroupOfTableRequest, GroupAdminError, MoveTablesRequest,
};

struct Cluster {
    host: Arc<StandaloneHost>,
    endpoint: GroupAdminEndpoint,
}

impl Cluster {
    fn start() -> Self {
        let host = Arc::new(StandaloneHost::new(group_aware_config(), vec![addr(1), addr(2)]));
        let services: Arc<dyn HostServices> = host.clone();
        let endpoint = GroupAdminEndpoint::start(&CoordinatorCell::new(), services).unwrap();
        Self { host, endpoint }
    }

    fn apply(&self, event: ClusterEvent) -> Result<(), GroupAdminError> {
        let guard = self.endpoint.guard();
        apply_event(&self.host, guard.as_ref(), &event)
    }

    fn group_of_table(&self, table: &str) -> Option<String> {
        let mut controller = CallController::new();
        let response = self.endpoint.facade().get_group_of_table(
            &mut controller,
            GetGroupOfTableRequest {
                table_name: table.to_string(),
            },
        );
        assert!(!controller.failed());
        response.group.map(|g| g.name)
    }

    fn add_group(&self, name: &str) {
        let mut controller = CallController::new();
        self.endpoint.facade().add_group(
            &mut controller,
            AddGroupRequest {
                group_name: name.to_string(),
            },
        );
        assert!(!controller.failed());
    }
}

fn create_table(name: &str) -> ClusterEvent {
    let table: TableName = name.parse().unwrap();
    ClusterEvent::CreateTable {
        table: TableDescriptor::new(table),
        regions: vec![],
    }
}

fn delete_table(name: &str) -> ClusterEvent {
    ClusterEvent::DeleteTable {
        table: name.parse().unwrap(),
    }
}

#[test]
fn test_table_group_lifecycle_scenario() {
    let cluster = Cluster::start();
    cluster.add_group("G1");
    cluster.apply(create_table("T1")).unwrap();
    assert_eq!(cluster.group_of_table("T1").as_deref(), Some("default"));

    let mut controller = CallController::new();
    cluster.endpoint.facade().move_tables(
        &mut controller,
        MoveTablesRequest {
            table_names: vec!["T1".into()],
            target_group: "G1".into(),
        },
    );
    assert!(!controller.failed());
    assert_eq!(cluster.group_of_table("T1").as_deref(), Some("G1"));

    cluster.apply(delete_table("T1")).unwrap();
    assert_eq!(cluster.group_of_table("T1"), None);
}

#[test]
fn test_delete_without_association_is_noop() {
    let cluster = Cluster::start();
    cluster.apply(delete_table("never_created")).unwrap();
    assert_eq!(cluster.group_of_table("never_created"), None);
}

#[test]
fn test_namespace_with_missing_group_is_rejected() {
    let cluster = Cluster::start();
    let result = cluster.apply(ClusterEvent::CreateNamespace {
        namespace: NamespaceDescriptor::new("sales").with_configuration(NAMESPACE_GROUP_PROP, "missing"),
    });
    assert!(matches!(result, Err(GroupAdminError::ConstraintViolation(_))));
    assert!(cluster.host.namespace_descriptor("sales").unwrap().is_none());
}

#[test]
fn test_namespace_without_or_with_existing_group_succeeds() {
    let cluster = Cluster::start();
    cluster
        .apply(ClusterEvent::CreateNamespace {
            namespace: NamespaceDescriptor::new("plain"),
        })
        .unwrap();

    cluster.add_group("G1");
    cluster
        .apply(ClusterEvent::CreateNamespace {
            namespace: NamespaceDescriptor::new("sales").with_configuration(NAMESPACE_GROUP_PROP, "G1"),
        })
        .unwrap();

    cluster.apply(create_table("sales:orders")).unwrap();
    assert_eq!(cluster.group_of_table("sales:orders").as_deref(), Some("G1"));
}

#[test]
fn test_modify_namespace_validates_group() {
    let cluster = Cluster::start();
    cluster
        .apply(ClusterEvent::CreateNamespace {
            namespace: NamespaceDescriptor::new("sales"),
        })
        .unwrap();

    let result = cluster.apply(ClusterEvent::ModifyNamespace {
        namespace: NamespaceDescriptor::new("sales").with_configuration(NAMESPACE_GROUP_PROP, "missing"),
    });
    assert!(matches!(result, Err(GroupAdminError::ConstraintViolation(_))));
    let ns = cluster.host.namespace_descriptor("sales").unwrap().unwrap();
    assert_eq!(ns.group(), None);
}

#[test]
fn test_other_events_pass_through() {
    let cluster = Cluster::start();
    cluster.apply(create_table("t")).unwrap();
    let table: TableName = "t".parse().unwrap();
    cluster.apply(ClusterEvent::DisableTable { table: table.clone() }).unwrap();
    cluster.apply(ClusterEvent::EnableTable { table: table.clone() }).unwrap();
    cluster.apply(ClusterEvent::TruncateTable { table }).unwrap();
    assert_eq!(cluster.group_of_table("t").as_deref(), Some("default"));
}
