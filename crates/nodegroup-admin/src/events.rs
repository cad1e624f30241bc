//! Host mutation events and the pipeline that runs them through an observer.
//!
//! The standalone server has no real table store. Its table and namespace
//! mutations arrive as [`ClusterEvent`]s, and [`apply_event`] drives them the
//! way a cluster manager would: pre-hook, apply, post-hook.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use nodegroup_common::model::{NamespaceDescriptor, RegionInfo, TableDescriptor, TableName};
use nodegroup_common::protocol::error::Result;

use crate::host::StandaloneHost;
use crate::observer::MasterObserver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClusterEvent {
    CreateTable {
        table: TableDescriptor,
        #[serde(default)]
        regions: Vec<RegionInfo>,
    },
    DeleteTable {
        table: TableName,
    },
    TruncateTable {
        table: TableName,
    },
    EnableTable {
        table: TableName,
    },
    DisableTable {
        table: TableName,
    },
    CreateNamespace {
        namespace: NamespaceDescriptor,
    },
    ModifyNamespace {
        namespace: NamespaceDescriptor,
    },
    DeleteNamespace {
        name: String,
    },
}

impl ClusterEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ClusterEvent::CreateTable { .. } => "create_table",
            ClusterEvent::DeleteTable { .. } => "delete_table",
            ClusterEvent::TruncateTable { .. } => "truncate_table",
            ClusterEvent::EnableTable { .. } => "enable_table",
            ClusterEvent::DisableTable { .. } => "disable_table",
            ClusterEvent::CreateNamespace { .. } => "create_namespace",
            ClusterEvent::ModifyNamespace { .. } => "modify_namespace",
            ClusterEvent::DeleteNamespace { .. } => "delete_namespace",
        }
    }
}

/// Runs `event` through `observer` against `host`.
///
/// A failing pre-hook aborts the event before anything is applied.
pub fn apply_event(
    host: &StandaloneHost,
    observer: &dyn MasterObserver,
    event: &ClusterEvent,
) -> Result<()> {
    debug!("Applying {} event", event.kind());
    let result = run(host, observer, event);
    if let Err(e) = &result {
        warn!("{} event rejected: {}", event.kind(), e);
    }
    result
}

fn run(host: &StandaloneHost, observer: &dyn MasterObserver, event: &ClusterEvent) -> Result<()> {
    match event {
        ClusterEvent::CreateTable { table, regions } => {
            host.ensure_namespace_exists(table.name.namespace())?;
            observer.pre_create_table(table, regions)?;
            observer.pre_create_table_action(table, regions)?;
            observer.post_completed_create_table_action(table, regions)?;
            observer.post_create_table(table, regions)
        }
        ClusterEvent::DeleteTable { table } => {
            observer.pre_delete_table(table)?;
            observer.pre_delete_table_action(table)?;
            observer.post_completed_delete_table_action(table)?;
            observer.post_delete_table(table)
        }
        ClusterEvent::TruncateTable { table } => {
            observer.pre_truncate_table(table)?;
            observer.pre_truncate_table_action(table)?;
            observer.post_completed_truncate_table_action(table)?;
            observer.post_truncate_table(table)
        }
        ClusterEvent::EnableTable { table } => {
            observer.pre_enable_table(table)?;
            observer.pre_enable_table_action(table)?;
            observer.post_completed_enable_table_action(table)?;
            observer.post_enable_table(table)
        }
        ClusterEvent::DisableTable { table } => {
            observer.pre_disable_table(table)?;
            observer.pre_disable_table_action(table)?;
            observer.post_completed_disable_table_action(table)?;
            observer.post_disable_table(table)
        }
        ClusterEvent::CreateNamespace { namespace } => {
            observer.pre_create_namespace(namespace)?;
            host.create_namespace(namespace.clone())?;
            observer.post_create_namespace(namespace)
        }
        ClusterEvent::ModifyNamespace { namespace } => {
            host.ensure_namespace_exists(&namespace.name)?;
            observer.pre_modify_namespace(namespace)?;
            host.modify_namespace(namespace.clone())?;
            observer.post_modify_namespace(namespace)
        }
        ClusterEvent::DeleteNamespace { name } => {
            observer.pre_delete_namespace(name)?;
            host.delete_namespace(name)?;
            observer.post_delete_namespace(name)
        }
    }
}
