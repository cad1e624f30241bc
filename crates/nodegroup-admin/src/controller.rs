//! Per-call failure channel.

use nodegroup_common::protocol::error::GroupAdminError;

/// Carries the failure, if any, of a single admin call.
///
/// The facade always returns a response; whether the call failed is read
/// from here by the transport.
#[derive(Debug, Default)]
pub struct CallController {
    failure: Option<GroupAdminError>,
}

impl CallController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the call as failed. A later failure replaces an earlier one.
    pub fn set_failed(&mut self, error: GroupAdminError) {
        self.failure = Some(error);
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure(&self) -> Option<&GroupAdminError> {
        self.failure.as_ref()
    }

    pub fn take_failure(&mut self) -> Option<GroupAdminError> {
        self.failure.take()
    }
}
