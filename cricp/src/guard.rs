//! Runtime capability check.
//!
//! Rootfs lookup relies on how containerd lays out its overlay mounts, so
//! only an allow-listed runtime name is accepted. Any other runtime,
//! including ones not known today, is refused.

use crate::runtime::{RuntimeService, RuntimeVersion};
use cricp_shared::{CricpError, CricpResult};

#[derive(Clone, Debug)]
pub struct RuntimeCapabilityGuard {
    client_version: String,
    supported_runtime: String,
}

impl RuntimeCapabilityGuard {
    /// # Arguments
    /// * `client_version` - API token sent in `VersionRequest`
    /// * `supported_runtime` - the only accepted `runtime_name`, compared exactly
    pub fn new(client_version: impl Into<String>, supported_runtime: impl Into<String>) -> Self {
        Self {
            client_version: client_version.into(),
            supported_runtime: supported_runtime.into(),
        }
    }

    /// Query the runtime identity and reject unsupported runtimes.
    pub async fn check(&self, service: &dyn RuntimeService) -> CricpResult<RuntimeVersion> {
        let version = service.version(&self.client_version).await?;
        tracing::debug!(
            runtime_name = %version.runtime_name,
            runtime_version = %version.runtime_version,
            "Connected runtime"
        );

        if version.runtime_name != self.supported_runtime {
            return Err(CricpError::UnsupportedRuntime(version.runtime_name));
        }
        Ok(version)
    }
}
