// Copyright 2025 Nodegroup Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host cluster-manager lifecycle hooks.
//!
//! The host invokes these synchronously at fixed points of its table,
//! namespace, region and admin pipelines. A `pre_*` hook returning an error
//! aborts the host operation; `post_*` hooks run after it has been applied.
//!
//! Every hook defaults to a no-op, so an observer overrides only the hooks it
//! cares about.

use nodegroup_common::model::{
    Address, NamespaceDescriptor, RegionInfo, TableDescriptor, TableName,
};
use nodegroup_common::protocol::error::Result;
use std::collections::BTreeSet;

/// Column family identity passed to column-family hooks.
pub type ColumnFamily = str;

/// Snapshot name passed to snapshot hooks.
pub type SnapshotName = str;

#[allow(unused_variables)]
pub trait MasterObserver: Send + Sync {
    fn pre_create_table(&self, desc: &TableDescriptor, regions: &[RegionInfo]) -> Result<()> {
        Ok(())
    }

    fn post_create_table(&self, desc: &TableDescriptor, regions: &[RegionInfo]) -> Result<()> {
        Ok(())
    }

    fn pre_create_table_action(
        &self,
        desc: &TableDescriptor,
        regions: &[RegionInfo],
    ) -> Result<()> {
        Ok(())
    }

    fn post_completed_create_table_action(
        &self,
        desc: &TableDescriptor,
        regions: &[RegionInfo],
    ) -> Result<()> {
        Ok(())
    }

    fn pre_delete_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_delete_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_delete_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_completed_delete_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_truncate_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_truncate_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_truncate_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_completed_truncate_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_modify_table(&self, table: &TableName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn post_modify_table(&self, table: &TableName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn pre_modify_table_action(&self, table: &TableName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn post_completed_modify_table_action(
        &self,
        table: &TableName,
        desc: &TableDescriptor,
    ) -> Result<()> {
        Ok(())
    }

    fn pre_enable_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_enable_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_enable_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_completed_enable_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_disable_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_disable_table(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_disable_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_completed_disable_table_action(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_table_flush(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_table_flush(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_add_column_family(&self, table: &TableName, family: &ColumnFamily) -> Result<()> {
        Ok(())
    }

    fn post_add_column_family(&self, table: &TableName, family: &ColumnFamily) -> Result<()> {
        Ok(())
    }

    fn pre_modify_column_family(&self, table: &TableName, family: &ColumnFamily) -> Result<()> {
        Ok(())
    }

    fn post_modify_column_family(&self, table: &TableName, family: &ColumnFamily) -> Result<()> {
        Ok(())
    }

    fn pre_delete_column_family(&self, table: &TableName, family: &ColumnFamily) -> Result<()> {
        Ok(())
    }

    fn post_delete_column_family(&self, table: &TableName, family: &ColumnFamily) -> Result<()> {
        Ok(())
    }

    fn pre_create_namespace(&self, ns: &NamespaceDescriptor) -> Result<()> {
        Ok(())
    }

    fn post_create_namespace(&self, ns: &NamespaceDescriptor) -> Result<()> {
        Ok(())
    }

    fn pre_modify_namespace(&self, ns: &NamespaceDescriptor) -> Result<()> {
        Ok(())
    }

    fn post_modify_namespace(&self, ns: &NamespaceDescriptor) -> Result<()> {
        Ok(())
    }

    fn pre_delete_namespace(&self, namespace: &str) -> Result<()> {
        Ok(())
    }

    fn post_delete_namespace(&self, namespace: &str) -> Result<()> {
        Ok(())
    }

    fn pre_get_namespace_descriptor(&self, namespace: &str) -> Result<()> {
        Ok(())
    }

    fn post_get_namespace_descriptor(&self, ns: &NamespaceDescriptor) -> Result<()> {
        Ok(())
    }

    fn pre_list_namespace_descriptors(&self) -> Result<()> {
        Ok(())
    }

    fn post_list_namespace_descriptors(&self, descriptors: &[NamespaceDescriptor]) -> Result<()> {
        Ok(())
    }

    fn pre_move(&self, region: &RegionInfo, source: &Address, destination: &Address) -> Result<()> {
        Ok(())
    }

    fn post_move(
        &self,
        region: &RegionInfo,
        source: &Address,
        destination: &Address,
    ) -> Result<()> {
        Ok(())
    }

    fn pre_assign(&self, region: &RegionInfo) -> Result<()> {
        Ok(())
    }

    fn post_assign(&self, region: &RegionInfo) -> Result<()> {
        Ok(())
    }

    fn pre_unassign(&self, region: &RegionInfo, force: bool) -> Result<()> {
        Ok(())
    }

    fn post_unassign(&self, region: &RegionInfo, force: bool) -> Result<()> {
        Ok(())
    }

    fn pre_region_offline(&self, region: &RegionInfo) -> Result<()> {
        Ok(())
    }

    fn post_region_offline(&self, region: &RegionInfo) -> Result<()> {
        Ok(())
    }

    fn pre_split_region(&self, table: &TableName, split_row: &[u8]) -> Result<()> {
        Ok(())
    }

    fn post_completed_split_region_action(
        &self,
        left: &RegionInfo,
        right: &RegionInfo,
    ) -> Result<()> {
        Ok(())
    }

    fn post_rollback_split_region_action(&self) -> Result<()> {
        Ok(())
    }

    fn pre_merge_regions(&self, regions: &[RegionInfo]) -> Result<()> {
        Ok(())
    }

    fn post_merge_regions(&self, regions: &[RegionInfo]) -> Result<()> {
        Ok(())
    }

    fn post_completed_merge_regions_action(
        &self,
        regions: &[RegionInfo],
        merged: &RegionInfo,
    ) -> Result<()> {
        Ok(())
    }

    fn post_rollback_merge_regions_action(&self, regions: &[RegionInfo]) -> Result<()> {
        Ok(())
    }

    fn pre_balance(&self) -> Result<()> {
        Ok(())
    }

    fn post_balance(&self, plans: usize) -> Result<()> {
        Ok(())
    }

    fn pre_balance_switch(&self, new_value: bool) -> Result<()> {
        Ok(())
    }

    fn post_balance_switch(&self, old_value: bool, new_value: bool) -> Result<()> {
        Ok(())
    }

    fn pre_set_split_or_merge_enabled(&self, enabled: bool) -> Result<()> {
        Ok(())
    }

    fn post_set_split_or_merge_enabled(&self, enabled: bool) -> Result<()> {
        Ok(())
    }

    fn pre_shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn pre_stop_master(&self) -> Result<()> {
        Ok(())
    }

    fn post_start_master(&self) -> Result<()> {
        Ok(())
    }

    fn pre_master_initialization(&self) -> Result<()> {
        Ok(())
    }

    fn pre_snapshot(&self, snapshot: &SnapshotName, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_snapshot(&self, snapshot: &SnapshotName, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_list_snapshot(&self, snapshot: &SnapshotName) -> Result<()> {
        Ok(())
    }

    fn post_list_snapshot(&self, snapshot: &SnapshotName) -> Result<()> {
        Ok(())
    }

    fn pre_clone_snapshot(&self, snapshot: &SnapshotName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn post_clone_snapshot(&self, snapshot: &SnapshotName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn pre_restore_snapshot(&self, snapshot: &SnapshotName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn post_restore_snapshot(&self, snapshot: &SnapshotName, desc: &TableDescriptor) -> Result<()> {
        Ok(())
    }

    fn pre_delete_snapshot(&self, snapshot: &SnapshotName) -> Result<()> {
        Ok(())
    }

    fn post_delete_snapshot(&self, snapshot: &SnapshotName) -> Result<()> {
        Ok(())
    }

    fn pre_get_table_descriptors(&self, tables: &[TableName]) -> Result<()> {
        Ok(())
    }

    fn post_get_table_descriptors(&self, descriptors: &[TableDescriptor]) -> Result<()> {
        Ok(())
    }

    fn pre_get_table_names(&self, regex: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn post_get_table_names(&self, descriptors: &[TableDescriptor]) -> Result<()> {
        Ok(())
    }

    fn pre_set_user_quota(
        &self,
        user: &str,
        table: Option<&TableName>,
        namespace: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    fn post_set_user_quota(
        &self,
        user: &str,
        table: Option<&TableName>,
        namespace: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    fn pre_set_table_quota(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn post_set_table_quota(&self, table: &TableName) -> Result<()> {
        Ok(())
    }

    fn pre_set_namespace_quota(&self, namespace: &str) -> Result<()> {
        Ok(())
    }

    fn post_set_namespace_quota(&self, namespace: &str) -> Result<()> {
        Ok(())
    }

    fn pre_abort_procedure(&self, proc_id: u64) -> Result<()> {
        Ok(())
    }

    fn post_abort_procedure(&self) -> Result<()> {
        Ok(())
    }

    fn pre_list_procedures(&self) -> Result<()> {
        Ok(())
    }

    fn post_list_procedures(&self) -> Result<()> {
        Ok(())
    }

    fn pre_request_lock(
        &self,
        namespace: Option<&str>,
        table: Option<&TableName>,
        description: &str,
    ) -> Result<()> {
        Ok(())
    }

    fn post_request_lock(
        &self,
        namespace: Option<&str>,
        table: Option<&TableName>,
        description: &str,
    ) -> Result<()> {
        Ok(())
    }

    fn pre_lock_heartbeat(&self, table: Option<&TableName>, description: &str) -> Result<()> {
        Ok(())
    }

    fn post_lock_heartbeat(&self, table: Option<&TableName>, description: &str) -> Result<()> {
        Ok(())
    }

    fn pre_move_servers(&self, servers: &BTreeSet<Address>, target_group: &str) -> Result<()> {
        Ok(())
    }

    fn post_move_servers(&self, servers: &BTreeSet<Address>, target_group: &str) -> Result<()> {
        Ok(())
    }

    fn pre_move_tables(&self, tables: &BTreeSet<TableName>, target_group: &str) -> Result<()> {
        Ok(())
    }

    fn post_move_tables(&self, tables: &BTreeSet<TableName>, target_group: &str) -> Result<()> {
        Ok(())
    }

    fn pre_add_group(&self, name: &str) -> Result<()> {
        Ok(())
    }

    fn post_add_group(&self, name: &str) -> Result<()> {
        Ok(())
    }

    fn pre_remove_group(&self, name: &str) -> Result<()> {
        Ok(())
    }

    fn post_remove_group(&self, name: &str) -> Result<()> {
        Ok(())
    }

    fn pre_balance_group(&self, name: &str) -> Result<()> {
        Ok(())
    }

    fn post_balance_group(&self, name: &str, balance_ran: bool) -> Result<()> {
        Ok(())
    }
}
