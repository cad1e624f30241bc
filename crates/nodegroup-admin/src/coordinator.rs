//! Group admin coordinator.
//!
//! [`GroupAdminCoordinator`] is the capability the admin facade and the
//! lifecycle guard delegate to. [`DirectoryCoordinator`] implements it over
//! any [`GroupDirectory`], validating each command and committing its effect
//! as a single directory batch.
//!
//! # Policy
//!
//! - Group names are `[A-Za-z0-9_]+`.
//! - The default group always exists and cannot be removed.
//! - Removing a group that still has servers or tables is rejected; removal
//!   never cascades.
//! - Moves require the target group to exist. Every server being moved must
//!   already belong to a group. Either every requested member ends up in the
//!   target or none does.

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::info;

use nodegroup_common::config::HostConfig;
use nodegroup_common::model::{Address, GroupInfo, TableName, DEFAULT_GROUP};
use nodegroup_common::protocol::error::{GroupAdminError, Result};

use crate::directory::{DirectoryBatch, GroupDirectory};

/// Validates and executes group-level operations.
///
/// Implementations do their own synchronization; callers hold no locks.
pub trait GroupAdminCoordinator: Send + Sync {
    /// Whether one-time initialization has completed.
    fn is_initialized(&self) -> bool {
        true
    }

    /// Runs one-time initialization (attaching directory state).
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn get_group(&self, name: &str) -> Result<Option<GroupInfo>>;

    fn get_group_of_table(&self, table: &TableName) -> Result<Option<GroupInfo>>;

    fn get_group_of_server(&self, server: &Address) -> Result<Option<GroupInfo>>;

    fn list_groups(&self) -> Result<Vec<GroupInfo>>;

    fn add_group(&self, name: &str) -> Result<()>;

    fn remove_group(&self, name: &str) -> Result<()>;

    fn move_servers(&self, servers: &BTreeSet<Address>, target_group: &str) -> Result<()>;

    fn move_tables(&self, tables: &BTreeSet<TableName>, target_group: &str) -> Result<()>;

    /// Returns whether a rebalance actually ran.
    fn balance_group(&self, name: &str) -> Result<bool>;

    /// Drops any group association of `table`; a no-op when there is none.
    fn remove_table(&self, table: &TableName) -> Result<()>;
}

/// Checks a group name against the allowed character set.
pub fn validate_group_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GroupAdminError::InvalidRequest(
            "Group name must not be empty".to_string(),
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GroupAdminError::InvalidRequest(format!(
            "Group name '{}' must contain only alphanumeric characters and '_'",
            name
        )));
    }
    Ok(())
}

/// Coordinator over a [`GroupDirectory`].
pub struct DirectoryCoordinator {
    directory: Arc<dyn GroupDirectory>,
    config: HostConfig,
    /// Serializes read-modify-write cycles against the directory.
    write_lock: Mutex<()>,
}

impl DirectoryCoordinator {
    pub fn new(directory: Arc<dyn GroupDirectory>, config: HostConfig) -> Self {
        Self {
            directory,
            config,
            write_lock: Mutex::new(()),
        }
    }

    fn require_group(&self, name: &str) -> Result<GroupInfo> {
        self.directory
            .get(name)?
            .ok_or_else(|| GroupAdminError::NotFound(format!("group '{}' does not exist", name)))
    }
}

impl GroupAdminCoordinator for DirectoryCoordinator {
    fn is_initialized(&self) -> bool {
        self.directory.is_initialized()
    }

    fn initialize(&self) -> Result<()> {
        self.directory.initialize()
    }

    fn get_group(&self, name: &str) -> Result<Option<GroupInfo>> {
        self.directory.get(name)
    }

    fn get_group_of_table(&self, table: &TableName) -> Result<Option<GroupInfo>> {
        self.directory.group_of_table(table)
    }

    fn get_group_of_server(&self, server: &Address) -> Result<Option<GroupInfo>> {
        self.directory.group_of_server(server)
    }

    fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        self.directory.list()
    }

    fn add_group(&self, name: &str) -> Result<()> {
        validate_group_name(name)?;
        let _guard = self.write_lock.lock();
        if self.directory.get(name)?.is_some() {
            return Err(GroupAdminError::ConstraintViolation(format!(
                "group '{}' already exists",
                name
            )));
        }
        self.directory
            .commit(DirectoryBatch::new().upsert(GroupInfo::new(name)))?;
        info!("Added group '{}'", name);
        Ok(())
    }

    fn remove_group(&self, name: &str) -> Result<()> {
        if name == DEFAULT_GROUP {
            return Err(GroupAdminError::ConstraintViolation(format!(
                "group '{}' cannot be removed",
                DEFAULT_GROUP
            )));
        }
        let _guard = self.write_lock.lock();
        let group = self.require_group(name)?;
        if !group.tables.is_empty() {
            return Err(GroupAdminError::ConstraintViolation(format!(
                "group '{}' has {} tables; move them out before removing the group",
                name,
                group.tables.len()
            )));
        }
        if !group.servers.is_empty() {
            return Err(GroupAdminError::ConstraintViolation(format!(
                "group '{}' has {} servers; move them out before removing the group",
                name,
                group.servers.len()
            )));
        }
        self.directory.commit(DirectoryBatch::new().remove(name))?;
        info!("Removed group '{}'", name);
        Ok(())
    }

    fn move_servers(&self, servers: &BTreeSet<Address>, target_group: &str) -> Result<()> {
        if servers.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock();
        let mut target = self.require_group(target_group)?;

        let mut moved = 0;
        let mut sources: BTreeMap<String, GroupInfo> = BTreeMap::new();
        for server in servers {
            if target.contains_server(server) {
                continue;
            }
            let source = match self.directory.group_of_server(server)? {
                Some(group) => group,
                None => {
                    return Err(GroupAdminError::NotFound(format!(
                        "server {} is not a member of any group",
                        server
                    )))
                }
            };
            sources
                .entry(source.name.clone())
                .or_insert(source)
                .remove_server(server);
            target.add_server(server.clone());
            moved += 1;
        }

        if sources.is_empty() {
            return Ok(());
        }
        let mut batch = DirectoryBatch::new();
        for (_, group) in sources {
            batch = batch.upsert(group);
        }
        self.directory.commit(batch.upsert(target))?;
        info!("Moved {} servers to group '{}'", moved, target_group);
        Ok(())
    }

    fn move_tables(&self, tables: &BTreeSet<TableName>, target_group: &str) -> Result<()> {
        if tables.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock();
        let mut target = self.require_group(target_group)?;

        let mut moved = 0;
        let mut sources: BTreeMap<String, GroupInfo> = BTreeMap::new();
        for table in tables {
            if target.contains_table(table) {
                continue;
            }
            if let Some(source) = self.directory.group_of_table(table)? {
                sources
                    .entry(source.name.clone())
                    .or_insert(source)
                    .remove_table(table);
            }
            target.add_table(table.clone());
            moved += 1;
        }

        if moved == 0 {
            return Ok(());
        }
        let mut batch = DirectoryBatch::new();
        for (_, group) in sources {
            batch = batch.upsert(group);
        }
        self.directory.commit(batch.upsert(target))?;
        info!("Moved {} tables to group '{}'", moved, target_group);
        Ok(())
    }

    fn balance_group(&self, name: &str) -> Result<bool> {
        let group = self.require_group(name)?;
        if !self.config.balancer_enabled()? {
            info!("Balancer is switched off; not balancing group '{}'", name);
            return Ok(false);
        }
        if group.servers.is_empty() || group.tables.is_empty() {
            return Ok(false);
        }
        info!(
            "Balancing {} tables across {} servers in group '{}'",
            group.tables.len(),
            group.servers.len(),
            name
        );
        Ok(true)
    }

    fn remove_table(&self, table: &TableName) -> Result<()> {
        let _guard = self.write_lock.lock();
        let Some(mut group) = self.directory.group_of_table(table)? else {
            return Ok(());
        };
        group.remove_table(table);
        self.directory.commit(DirectoryBatch::new().upsert(group))?;
        info!("Removed table {} from its group", table);
        Ok(())
    }
}
