//! The `cp` operation.

use super::FileCopier;
use crate::config::CopyOptions;
use crate::guard::RuntimeCapabilityGuard;
use crate::resolve::{ContainerResolver, MountTableReader, PathEndpointResolver, RootfsLocator};
use crate::runtime::RuntimeConnector;
use cricp_shared::{CricpError, CricpResult};

/// Runs one copy: argument check, connect, guard, resolve source then
/// destination, copy.
///
/// The runtime connection lives only inside [`execute`](Self::execute) and
/// is dropped on every return path.
pub struct CopyOrchestrator<C, F> {
    connector: C,
    copier: F,
    options: CopyOptions,
}

impl<C: RuntimeConnector, F: FileCopier> CopyOrchestrator<C, F> {
    pub fn new(connector: C, copier: F, options: CopyOptions) -> Self {
        Self {
            connector,
            copier,
            options,
        }
    }

    /// Copy `args[0]` to `args[1]`.
    ///
    /// Each argument is a host path or `name_pattern:path`. Nothing is copied
    /// unless both resolve.
    pub async fn execute(&self, args: &[String]) -> CricpResult<()> {
        let [src, dst] = args else {
            return Err(CricpError::Usage(format!(
                "cp <src> <dst> (expected 2 arguments, got {})",
                args.len()
            )));
        };

        let service = self.connector.connect().await?;

        RuntimeCapabilityGuard::new(
            self.options.client_version.as_str(),
            self.options.supported_runtime.as_str(),
        )
        .check(service.as_ref())
        .await?;

        let resolver = PathEndpointResolver::new(RootfsLocator::new(
            ContainerResolver::new(service.as_ref()),
            MountTableReader::new(&self.options.mount_table),
        ));
        let src = resolver.resolve(src).await?;
        let dst = resolver.resolve(dst).await?;

        tracing::debug!("Copying {} to {}", src, dst);
        self.copier.copy_file(&src, &dst).await
    }
}
