//! Group directory: the authoritative store of group membership.
//!
//! The admin endpoint never talks to a directory directly; it goes through
//! a [`GroupAdminCoordinator`](crate::coordinator::GroupAdminCoordinator).
//! [`InMemoryGroupDirectory`] backs the standalone server and the tests.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use nodegroup_common::model::{Address, GroupInfo, TableName, DEFAULT_GROUP};
use nodegroup_common::protocol::error::{GroupAdminError, Result};

/// A set of group writes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryBatch {
    /// Groups to insert or replace
    pub upserts: Vec<GroupInfo>,
    /// Names of groups to delete
    pub removals: Vec<String>,
}

impl DirectoryBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(mut self, group: GroupInfo) -> Self {
        self.upserts.push(group);
        self
    }

    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.removals.push(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.removals.is_empty()
    }
}

/// Lookup and mutation primitives over group state.
///
/// Implementations must apply a [`DirectoryBatch`] atomically: after
/// `commit` returns an error, readers observe the state from before the call.
pub trait GroupDirectory: Send + Sync {
    fn is_initialized(&self) -> bool;

    /// Loads or attaches the directory state. Called once before first use.
    fn initialize(&self) -> Result<()>;

    fn get(&self, name: &str) -> Result<Option<GroupInfo>>;

    fn list(&self) -> Result<Vec<GroupInfo>>;

    fn group_of_server(&self, server: &Address) -> Result<Option<GroupInfo>> {
        Ok(self.list()?.into_iter().find(|g| g.contains_server(server)))
    }

    fn group_of_table(&self, table: &TableName) -> Result<Option<GroupInfo>> {
        Ok(self.list()?.into_iter().find(|g| g.contains_table(table)))
    }

    fn commit(&self, batch: DirectoryBatch) -> Result<()>;
}

/// Process-local directory that seeds the default group with the cluster's
/// online servers.
pub struct InMemoryGroupDirectory {
    groups: RwLock<BTreeMap<String, GroupInfo>>,
    online_servers: Vec<Address>,
    initialized: AtomicBool,
}

impl InMemoryGroupDirectory {
    pub fn new(online_servers: Vec<Address>) -> Self {
        Self {
            groups: RwLock::new(BTreeMap::new()),
            online_servers,
            initialized: AtomicBool::new(false),
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(GroupAdminError::Coordinator(
                "group directory is not initialized".to_string(),
            ))
        }
    }
}

impl GroupDirectory for InMemoryGroupDirectory {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn initialize(&self) -> Result<()> {
        let mut groups = self.groups.write();
        if self.is_initialized() {
            return Ok(());
        }

        let default = groups
            .entry(DEFAULT_GROUP.to_string())
            .or_insert_with(|| GroupInfo::new(DEFAULT_GROUP));
        for server in &self.online_servers {
            default.add_server(server.clone());
        }

        self.initialized.store(true, Ordering::Release);
        info!(
            "Group directory initialized with {} servers in '{}'",
            self.online_servers.len(),
            DEFAULT_GROUP
        );
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<GroupInfo>> {
        self.ensure_initialized()?;
        Ok(self.groups.read().get(name).cloned())
    }

    fn list(&self) -> Result<Vec<GroupInfo>> {
        self.ensure_initialized()?;
        Ok(self.groups.read().values().cloned().collect())
    }

    fn group_of_server(&self, server: &Address) -> Result<Option<GroupInfo>> {
        self.ensure_initialized()?;
        Ok(self
            .groups
            .read()
            .values()
            .find(|g| g.contains_server(server))
            .cloned())
    }

    fn group_of_table(&self, table: &TableName) -> Result<Option<GroupInfo>> {
        self.ensure_initialized()?;
        Ok(self
            .groups
            .read()
            .values()
            .find(|g| g.contains_table(table))
            .cloned())
    }

    fn commit(&self, batch: DirectoryBatch) -> Result<()> {
        self.ensure_initialized()?;
        let mut groups = self.groups.write();
        debug!(
            "Committing {} group updates and {} removals",
            batch.upserts.len(),
            batch.removals.len()
        );
        for name in &batch.removals {
            groups.remove(name);
        }
        for group in batch.upserts {
            groups.insert(group.name.clone(), group);
        }
        Ok(())
    }
}
