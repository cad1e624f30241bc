//! Fakes shared by the admin integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use nodegroup_admin::{
    DirectoryBatch, GroupAdminCoordinator, GroupDirectory, HostServices, InMemoryGroupDirectory,
};
use nodegroup_common::config::{HostConfig, BALANCER_CLASS_KEY, GROUP_BALANCER_CLASS};
use nodegroup_common::model::{Address, GroupInfo, NamespaceDescriptor, TableName};
use nodegroup_common::protocol::error::{GroupAdminError, Result};

pub fn addr(port: u16) -> Address {
    Address::from_parts("rs", port)
}

pub fn group_aware_config() -> HostConfig {
    HostConfig::new().with(BALANCER_CLASS_KEY, GROUP_BALANCER_CLASS)
}

// ============================================================================
// Fake coordinator
// ============================================================================

/// Records every call and answers from a small in-memory map.
///
/// `fail_with` makes every call fail with a coordinator error.
#[derive(Default)]
pub struct FakeCoordinator {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
    groups: Mutex<BTreeMap<String, GroupInfo>>,
    balance_result: AtomicBool,
    init_count: AtomicUsize,
    initialized: AtomicBool,
    init_delay: Option<Duration>,
}

impl FakeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialization sleeps for `delay` to widen race windows.
    pub fn with_init_delay(delay: Duration) -> Self {
        Self {
            init_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn with_group(self, group: GroupInfo) -> Self {
        self.groups.lock().unwrap().insert(group.name.clone(), group);
        self
    }

    pub fn set_balance_result(&self, ran: bool) {
        self.balance_result.store(ran, Ordering::SeqCst);
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(GroupAdminError::Coordinator(message.clone())),
            None => Ok(()),
        }
    }
}

impl GroupAdminCoordinator for FakeCoordinator {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn initialize(&self) -> Result<()> {
        if let Some(delay) = self.init_delay {
            thread::sleep(delay);
        }
        self.init_count.fetch_add(1, Ordering::SeqCst);
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn get_group(&self, name: &str) -> Result<Option<GroupInfo>> {
        self.record(format!("get_group:{}", name))?;
        Ok(self.groups.lock().unwrap().get(name).cloned())
    }

    fn get_group_of_table(&self, table: &TableName) -> Result<Option<GroupInfo>> {
        self.record(format!("get_group_of_table:{}", table))?;
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .find(|g| g.contains_table(table))
            .cloned())
    }

    fn get_group_of_server(&self, server: &Address) -> Result<Option<GroupInfo>> {
        self.record(format!("get_group_of_server:{}", server))?;
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .find(|g| g.contains_server(server))
            .cloned())
    }

    fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        self.record("list_groups".to_string())?;
        Ok(self.groups.lock().unwrap().values().cloned().collect())
    }

    fn add_group(&self, name: &str) -> Result<()> {
        self.record(format!("add_group:{}", name))?;
        self.groups
            .lock()
            .unwrap()
            .insert(name.to_string(), GroupInfo::new(name));
        Ok(())
    }

    fn remove_group(&self, name: &str) -> Result<()> {
        self.record(format!("remove_group:{}", name))?;
        self.groups.lock().unwrap().remove(name);
        Ok(())
    }

    fn move_servers(&self, servers: &BTreeSet<Address>, target_group: &str) -> Result<()> {
        self.record(format!("move_servers:{}:{}", servers.len(), target_group))
    }

    fn move_tables(&self, tables: &BTreeSet<TableName>, target_group: &str) -> Result<()> {
        self.record(format!("move_tables:{}:{}", tables.len(), target_group))
    }

    fn balance_group(&self, name: &str) -> Result<bool> {
        self.record(format!("balance_group:{}", name))?;
        Ok(self.balance_result.load(Ordering::SeqCst))
    }

    fn remove_table(&self, table: &TableName) -> Result<()> {
        self.record(format!("remove_table:{}", table))
    }
}

// ============================================================================
// Directory with injectable commit failures
// ============================================================================

pub struct FlakyDirectory {
    inner: InMemoryGroupDirectory,
    fail_commits: AtomicBool,
}

impl FlakyDirectory {
    pub fn new(online_servers: Vec<Address>) -> Self {
        Self {
            inner: InMemoryGroupDirectory::new(online_servers),
            fail_commits: AtomicBool::new(false),
        }
    }

    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

impl GroupDirectory for FlakyDirectory {
    fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    fn initialize(&self) -> Result<()> {
        self.inner.initialize()
    }

    fn get(&self, name: &str) -> Result<Option<GroupInfo>> {
        self.inner.get(name)
    }

    fn list(&self) -> Result<Vec<GroupInfo>> {
        self.inner.list()
    }

    fn commit(&self, batch: DirectoryBatch) -> Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(GroupAdminError::Coordinator(
                "directory write failed".to_string(),
            ));
        }
        self.inner.commit(batch)
    }
}

// ============================================================================
// Fake host
// ============================================================================

/// Host whose coordinators are [`FakeCoordinator`]s; counts constructions.
pub struct FakeHost {
    config: HostConfig,
    namespaces: Mutex<BTreeMap<String, NamespaceDescriptor>>,
    created: Mutex<Vec<Arc<FakeCoordinator>>>,
    init_delay: Duration,
}

impl FakeHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            namespaces: Mutex::new(BTreeMap::new()),
            created: Mutex::new(Vec::new()),
            init_delay: Duration::from_millis(0),
        }
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub fn add_namespace(&self, ns: NamespaceDescriptor) {
        self.namespaces.lock().unwrap().insert(ns.name.clone(), ns);
    }

    pub fn creations(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn created(&self) -> Vec<Arc<FakeCoordinator>> {
        self.created.lock().unwrap().clone()
    }
}

impl HostServices for FakeHost {
    fn configuration(&self) -> &HostConfig {
        &self.config
    }

    fn create_coordinator(&self) -> Result<Arc<dyn GroupAdminCoordinator>> {
        let coordinator = Arc::new(FakeCoordinator::with_init_delay(self.init_delay));
        self.created.lock().unwrap().push(Arc::clone(&coordinator));
        Ok(coordinator)
    }

    fn namespace_descriptor(&self, name: &str) -> Result<Option<NamespaceDescriptor>> {
        Ok(self.namespaces.lock().unwrap().get(name).cloned())
    }
}
