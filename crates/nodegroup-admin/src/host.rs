//! Host services consumed by the admin endpoint.
//!
//! [`HostServices`] is what the hosting cluster manager hands the endpoint at
//! startup: its configuration, a way to build the directory-backed
//! coordinator, and namespace lookups for the lifecycle guard.
//! [`StandaloneHost`] is the implementation used by the standalone server.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use nodegroup_common::config::HostConfig;
use nodegroup_common::model::{Address, NamespaceDescriptor, DEFAULT_NAMESPACE};
use nodegroup_common::protocol::error::{GroupAdminError, Result};

use crate::coordinator::{DirectoryCoordinator, GroupAdminCoordinator};
use crate::directory::InMemoryGroupDirectory;

pub trait HostServices: Send + Sync {
    fn configuration(&self) -> &HostConfig;

    /// Builds a new, not yet initialized, coordinator.
    fn create_coordinator(&self) -> Result<Arc<dyn GroupAdminCoordinator>>;

    fn namespace_descriptor(&self, name: &str) -> Result<Option<NamespaceDescriptor>>;
}

/// In-process host with an in-memory group directory and namespace registry.
pub struct StandaloneHost {
    config: HostConfig,
    servers: Vec<Address>,
    namespaces: RwLock<BTreeMap<String, NamespaceDescriptor>>,
}

impl StandaloneHost {
    pub fn new(config: HostConfig, servers: Vec<Address>) -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert(
            DEFAULT_NAMESPACE.to_string(),
            NamespaceDescriptor::new(DEFAULT_NAMESPACE),
        );
        Self {
            config,
            servers,
            namespaces: RwLock::new(namespaces),
        }
    }

    pub fn create_namespace(&self, ns: NamespaceDescriptor) -> Result<()> {
        let mut namespaces = self.namespaces.write();
        if namespaces.contains_key(&ns.name) {
            return Err(GroupAdminError::ConstraintViolation(format!(
                "namespace '{}' already exists",
                ns.name
            )));
        }
        namespaces.insert(ns.name.clone(), ns);
        Ok(())
    }

    pub fn modify_namespace(&self, ns: NamespaceDescriptor) -> Result<()> {
        let mut namespaces = self.namespaces.write();
        match namespaces.get_mut(&ns.name) {
            Some(existing) => {
                *existing = ns;
                Ok(())
            }
            None => Err(GroupAdminError::NotFound(format!(
                "namespace '{}' does not exist",
                ns.name
            ))),
        }
    }

    pub fn delete_namespace(&self, name: &str) -> Result<()> {
        if name == DEFAULT_NAMESPACE {
            return Err(GroupAdminError::ConstraintViolation(format!(
                "namespace '{}' cannot be removed",
                DEFAULT_NAMESPACE
            )));
        }
        self.namespaces
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| {
                GroupAdminError::NotFound(format!("namespace '{}' does not exist", name))
            })
    }

    pub fn ensure_namespace_exists(&self, name: &str) -> Result<()> {
        if self.namespaces.read().contains_key(name) {
            Ok(())
        } else {
            Err(GroupAdminError::NotFound(format!(
                "namespace '{}' does not exist",
                name
            )))
        }
    }
}

impl HostServices for StandaloneHost {
    fn configuration(&self) -> &HostConfig {
        &self.config
    }

    fn create_coordinator(&self) -> Result<Arc<dyn GroupAdminCoordinator>> {
        let directory = Arc::new(InMemoryGroupDirectory::new(self.servers.clone()));
        Ok(Arc::new(DirectoryCoordinator::new(directory, self.config.clone())))
    }

    fn namespace_descriptor(&self, name: &str) -> Result<Option<NamespaceDescriptor>> {
        Ok(self.namespaces.read().get(name).cloned())
    }
}
