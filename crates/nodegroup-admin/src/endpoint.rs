//! Admin endpoint lifecycle.

use std::sync::Arc;
use tracing::info;

use nodegroup_common::protocol::error::Result;

use crate::coordinator::GroupAdminCoordinator;
use crate::facade::AdminFacade;
use crate::guard::LifecycleGuard;
use crate::host::HostServices;
use crate::initializer::CoordinatorCell;

/// The facade and guard of one endpoint instance, both bound to the shared
/// coordinator.
pub struct GroupAdminEndpoint {
    coordinator: Arc<dyn GroupAdminCoordinator>,
    facade: Arc<AdminFacade>,
    guard: Arc<LifecycleGuard>,
}

impl GroupAdminEndpoint {
    /// Brings the endpoint up.
    ///
    /// Fails with a configuration error when the host's balancer is not group
    /// aware, or with whatever error coordinator initialization reports.
    pub fn start(cell: &CoordinatorCell, host: Arc<dyn HostServices>) -> Result<Self> {
        let coordinator = cell.ensure_coordinator(host.as_ref())?;
        let facade = Arc::new(AdminFacade::new(Arc::clone(&coordinator)));
        let guard = Arc::new(LifecycleGuard::new(Arc::clone(&coordinator), host));
        info!("Group admin endpoint started");
        Ok(Self {
            coordinator,
            facade,
            guard,
        })
    }

    pub fn stop(&self) {
        info!("Group admin endpoint stopped");
    }

    pub fn coordinator(&self) -> &Arc<dyn GroupAdminCoordinator> {
        &self.coordinator
    }

    pub fn facade(&self) -> Arc<AdminFacade> {
        Arc::clone(&self.facade)
    }

    pub fn guard(&self) -> Arc<LifecycleGuard> {
        Arc::clone(&self.guard)
    }
}
