//! Container name pattern → host path of the container's root filesystem.

use super::{ContainerResolver, MarkerMatcher, MountTableReader, RootfsMatcher};
use cricp_shared::CricpResult;

/// Composes [`ContainerResolver`] and [`MountTableReader`].
///
/// Errors from either step are returned as-is.
pub struct RootfsLocator<'a, M = MarkerMatcher> {
    resolver: ContainerResolver<'a>,
    mounts: MountTableReader<M>,
}

impl<'a, M: RootfsMatcher> RootfsLocator<'a, M> {
    pub fn new(resolver: ContainerResolver<'a>, mounts: MountTableReader<M>) -> Self {
        Self { resolver, mounts }
    }

    pub async fn locate(&self, pattern: &str) -> CricpResult<String> {
        let container_id = self.resolver.resolve(pattern).await?;
        self.mounts.find_root_mount(&container_id)
    }
}
