//! Copy endpoint parsing and resolution.

use super::{MarkerMatcher, RootfsLocator, RootfsMatcher};
use cricp_shared::{CricpError, CricpResult};

/// One side of a copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// A path on the host, used as-is.
    Host(String),

    /// A path inside the container whose name matches `name_pattern`.
    Container { name_pattern: String, path: String },
}

impl Endpoint {
    /// Parse `path` or `name_pattern:path`.
    ///
    /// Splits at the first `:` only, so `web:/data/a:b` is the path
    /// `/data/a:b` in container `web`.
    pub fn parse(spec: &str) -> CricpResult<Self> {
        match spec.split_once(':') {
            None => Ok(Endpoint::Host(spec.to_string())),
            Some(("", _)) => Err(CricpError::InvalidArgument(format!(
                "missing container name in '{}'",
                spec
            ))),
            Some((name_pattern, path)) => Ok(Endpoint::Container {
                name_pattern: name_pattern.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

/// Append an in-container path to a rootfs path with exactly one `/` between them.
///
/// An empty fragment yields the root itself.
pub fn join_rootfs(root: &str, fragment: &str) -> String {
    let fragment = fragment.trim_start_matches('/');
    if fragment.is_empty() {
        return root.to_string();
    }
    format!("{}/{}", root.trim_end_matches('/'), fragment)
}

/// Resolves copy endpoints to host paths.
pub struct PathEndpointResolver<'a, M = MarkerMatcher> {
    locator: RootfsLocator<'a, M>,
}

impl<'a, M: RootfsMatcher> PathEndpointResolver<'a, M> {
    pub fn new(locator: RootfsLocator<'a, M>) -> Self {
        Self { locator }
    }

    /// Resolve an endpoint spec to a host path.
    ///
    /// Host paths are returned unchanged without touching the runtime or the
    /// filesystem.
    pub async fn resolve(&self, spec: &str) -> CricpResult<String> {
        tracing::debug!("Resolving path {}", spec);
        match Endpoint::parse(spec)? {
            Endpoint::Host(path) => Ok(path),
            Endpoint::Container { name_pattern, path } => {
                let root = self.locator.locate(&name_pattern).await?;
                let resolved = join_rootfs(&root, &path);
                tracing::debug!(container = %name_pattern, %resolved, "Resolved container path");
                Ok(resolved)
            }
        }
    }
}
