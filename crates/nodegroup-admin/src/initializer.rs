//! One-time construction of the shared coordinator.
//!
//! A [`CoordinatorCell`] is created once at process startup and passed to
//! every endpoint that needs the coordinator. The first
//! [`ensure_coordinator`](CoordinatorCell::ensure_coordinator) call builds and
//! initializes it; later calls get the same handle back.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use nodegroup_common::config::{HostConfig, BALANCER_CLASS_KEY, GROUP_BALANCER_CLASS};
use nodegroup_common::protocol::error::{GroupAdminError, Result};

use crate::coordinator::GroupAdminCoordinator;
use crate::host::HostServices;

/// Fails unless the configured balancer places regions by group.
///
/// Accepts the bare class name or any dotted path ending in it.
pub fn check_balancer(config: &HostConfig) -> Result<()> {
    let class = config.balancer_class().ok_or_else(|| {
        GroupAdminError::Configuration(format!("'{}' is not set", BALANCER_CLASS_KEY))
    })?;
    let simple_name = class.rsplit('.').next().unwrap_or(class);
    if simple_name == GROUP_BALANCER_CLASS {
        Ok(())
    } else {
        Err(GroupAdminError::Configuration(format!(
            "Configured balancer '{}' is not a group-aware balancer; set '{}' to '{}'",
            class, BALANCER_CLASS_KEY, GROUP_BALANCER_CLASS
        )))
    }
}

/// Process-wide slot for the coordinator handle.
#[derive(Default)]
pub struct CoordinatorCell {
    slot: Mutex<Option<Arc<dyn GroupAdminCoordinator>>>,
}

impl CoordinatorCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the published handle, if any.
    pub fn get(&self) -> Option<Arc<dyn GroupAdminCoordinator>> {
        self.slot.lock().clone()
    }

    /// Returns the shared coordinator, constructing and initializing it on
    /// first use.
    ///
    /// The whole check, construct, initialize and publish sequence runs under
    /// the cell's lock. Nothing is published unless initialization succeeded.
    pub fn ensure_coordinator(
        &self,
        host: &dyn HostServices,
    ) -> Result<Arc<dyn GroupAdminCoordinator>> {
        check_balancer(host.configuration())?;

        let mut slot = self.slot.lock();
        if let Some(existing) = slot.as_ref() {
            if !existing.is_initialized() {
                warn!("Shared coordinator was published uninitialized; completing initialization");
                existing.initialize()?;
            }
            return Ok(Arc::clone(existing));
        }

        let coordinator = host.create_coordinator()?;
        if !coordinator.is_initialized() {
            coordinator.initialize()?;
        }
        *slot = Some(Arc::clone(&coordinator));
        info!("Group admin coordinator initialized");
        Ok(coordinator)
    }

    /// Publishes an already-built handle without initializing it.
    ///
    /// Used by hosts that construct the coordinator themselves. An occupied
    /// slot is left alone and its handle is returned instead.
    pub fn publish(
        &self,
        coordinator: Arc<dyn GroupAdminCoordinator>,
    ) -> Arc<dyn GroupAdminCoordinator> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(existing) => {
                warn!("Shared coordinator already published; keeping the existing handle");
                Arc::clone(existing)
            }
            None => {
                *slot = Some(Arc::clone(&coordinator));
                coordinator
            }
        }
    }
}
