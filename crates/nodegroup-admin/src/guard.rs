//! Lifecycle guard: the four host hooks that touch group state.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use nodegroup_common::model::{
    NamespaceDescriptor, RegionInfo, TableDescriptor, TableName, DEFAULT_GROUP,
};
use nodegroup_common::protocol::error::{GroupAdminError, Result};

use crate::coordinator::GroupAdminCoordinator;
use crate::host::HostServices;
use crate::observer::MasterObserver;

/// Keeps table placement and namespace configuration consistent with the
/// group directory. Stateless apart from the shared handles.
pub struct LifecycleGuard {
    coordinator: Arc<dyn GroupAdminCoordinator>,
    host: Arc<dyn HostServices>,
}

impl LifecycleGuard {
    pub fn new(coordinator: Arc<dyn GroupAdminCoordinator>, host: Arc<dyn HostServices>) -> Self {
        Self { coordinator, host }
    }

    /// Picks the group a new table is placed in.
    ///
    /// An explicit table property wins when it names an existing group. Next
    /// comes the namespace's group, which must exist. Otherwise the default
    /// group.
    fn resolve_group(&self, desc: &TableDescriptor) -> Result<String> {
        if let Some(explicit) = desc.group() {
            if self.coordinator.get_group(explicit)?.is_some() {
                return Ok(explicit.to_string());
            }
            warn!(
                "Table {} requests missing group '{}'; ignoring the request",
                desc.name, explicit
            );
        }

        let namespace = self.host.namespace_descriptor(desc.name.namespace())?;
        if let Some(group) = namespace.as_ref().and_then(NamespaceDescriptor::group) {
            if self.coordinator.get_group(group)?.is_none() {
                return Err(GroupAdminError::ConstraintViolation(format!(
                    "group '{}' of namespace '{}' does not exist",
                    group,
                    desc.name.namespace()
                )));
            }
            return Ok(group.to_string());
        }

        Ok(DEFAULT_GROUP.to_string())
    }

    fn prepare_group_for_table(&self, desc: &TableDescriptor) -> Result<()> {
        let group_name = self.resolve_group(desc)?;
        let group = self.coordinator.get_group(&group_name)?.ok_or_else(|| {
            GroupAdminError::ConstraintViolation(format!(
                "group '{}' for table {} does not exist",
                group_name, desc.name
            ))
        })?;
        if !group.contains_table(&desc.name) {
            self.coordinator
                .move_tables(&BTreeSet::from([desc.name.clone()]), &group_name)?;
        }
        info!("Placed table {} in group '{}'", desc.name, group_name);
        Ok(())
    }

    fn check_namespace_group(&self, ns: &NamespaceDescriptor) -> Result<()> {
        let Some(group) = ns.group() else {
            return Ok(());
        };
        if self.coordinator.get_group(group)?.is_none() {
            warn!("Rejecting namespace '{}': group '{}' does not exist", ns.name, group);
            return Err(GroupAdminError::ConstraintViolation(format!(
                "group '{}' does not exist",
                group
            )));
        }
        Ok(())
    }
}

impl MasterObserver for LifecycleGuard {
    fn pre_create_table(&self, desc: &TableDescriptor, _regions: &[RegionInfo]) -> Result<()> {
        self.prepare_group_for_table(desc)
    }

    fn post_delete_table(&self, table: &TableName) -> Result<()> {
        self.coordinator.remove_table(table)
    }

    fn pre_create_namespace(&self, ns: &NamespaceDescriptor) -> Result<()> {
        self.check_namespace_group(ns)
    }

    fn pre_modify_namespace(&self, ns: &NamespaceDescriptor) -> Result<()> {
        self.check_namespace_group(ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegroup_common::config::HostConfig;
    use nodegroup_common::model::{NAMESPACE_GROUP_PROP, TABLE_GROUP_PROP};

    use crate::host::StandaloneHost;

    fn setup() -> (Arc<StandaloneHost>, Arc<dyn GroupAdminCoordinator>, LifecycleGuard) {
        let host = Arc::new(StandaloneHost::new(HostConfig::new(), vec![]));
        let coordinator = host.create_coordinator().unwrap();
        coordinator.initialize().unwrap();
        coordinator.add_group("g1").unwrap();
        let guard = LifecycleGuard::new(Arc::clone(&coordinator), host.clone());
        (host, coordinator, guard)
    }

    fn group_of(coordinator: &Arc<dyn GroupAdminCoordinator>, table: &TableName) -> Option<String> {
        coordinator
            .get_group_of_table(table)
            .unwrap()
            .map(|g| g.name)
    }

    #[test]
    fn test_table_without_property_lands_in_default() {
        let (_host, coordinator, guard) = setup();
        let table = TableName::new("default", "t");
        guard.pre_create_table(&TableDescriptor::new(table.clone()), &[]).unwrap();
        assert_eq!(group_of(&coordinator, &table).as_deref(), Some(DEFAULT_GROUP));
    }

    #[test]
    fn test_explicit_group_is_honoured() {
        let (_host, coordinator, guard) = setup();
        let table = TableName::new("default", "t");
        let desc = TableDescriptor::new(table.clone()).with_value(TABLE_GROUP_PROP, "g1");
        guard.pre_create_table(&desc, &[]).unwrap();
        assert_eq!(group_of(&coordinator, &table).as_deref(), Some("g1"));
    }

    #[test]
    fn test_explicit_missing_group_falls_back_to_default() {
        let (_host, coordinator, guard) = setup();
        let table = TableName::new("default", "t");
        let desc = TableDescriptor::new(table.clone()).with_value(TABLE_GROUP_PROP, "ghost");
        guard.pre_create_table(&desc, &[]).unwrap();
        assert_eq!(group_of(&coordinator, &table).as_deref(), Some(DEFAULT_GROUP));
    }

    #[test]
    fn test_namespace_group_is_used() {
        let (host, coordinator, guard) = setup();
        host.create_namespace(
            NamespaceDescriptor::new("sales").with_configuration(NAMESPACE_GROUP_PROP, "g1"),
        )
        .unwrap();
        let table = TableName::new("sales", "orders");
        guard.pre_create_table(&TableDescriptor::new(table.clone()), &[]).unwrap();
        assert_eq!(group_of(&coordinator, &table).as_deref(), Some("g1"));
    }

    #[test]
    fn test_namespace_group_removed_aborts_create() {
        let (host, coordinator, guard) = setup();
        host.create_namespace(
            NamespaceDescriptor::new("sales").with_configuration(NAMESPACE_GROUP_PROP, "g1"),
        )
        .unwrap();
        coordinator.remove_group("g1").unwrap();

        let table = TableName::new("sales", "orders");
        assert!(matches!(
            guard.pre_create_table(&TableDescriptor::new(table.clone()), &[]),
            Err(GroupAdminError::ConstraintViolation(_))
        ));
        assert!(group_of(&coordinator, &table).is_none());
    }

    #[test]
    fn test_post_delete_clears_association() {
        let (_host, coordinator, guard) = setup();
        let table = TableName::new("default", "t");
        guard.pre_create_table(&TableDescriptor::new(table.clone()), &[]).unwrap();
        guard.post_delete_table(&table).unwrap();
        assert!(group_of(&coordinator, &table).is_none());

        guard.post_delete_table(&table).unwrap();
    }

    #[test]
    fn test_namespace_hooks() {
        let (_host, _coordinator, guard) = setup();
        let missing = NamespaceDescriptor::new("ns").with_configuration(NAMESPACE_GROUP_PROP, "missing");
        assert!(matches!(
            guard.pre_create_namespace(&missing),
            Err(GroupAdminError::ConstraintViolation(_))
        ));
        assert!(matches!(
            guard.pre_modify_namespace(&missing),
            Err(GroupAdminError::ConstraintViolation(_))
        ));

        assert!(guard.pre_create_namespace(&NamespaceDescriptor::new("ns")).is_ok());
        let existing = NamespaceDescriptor::new("ns").with_configuration(NAMESPACE_GROUP_PROP, "g1");
        assert!(guard.pre_create_namespace(&existing).is_ok());
        assert!(guard.pre_modify_namespace(&existing).is_ok());
    }
}
