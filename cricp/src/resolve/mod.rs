//! Turning copy endpoints into host paths.
//!
//! - [`ContainerResolver`]: container name pattern → container id
//! - [`MountTableReader`]: container id → rootfs mount target
//! - [`RootfsLocator`]: both of the above
//! - [`PathEndpointResolver`]: `name:path` / host path → host path

mod container;
mod endpoint;
mod mounts;
mod rootfs;

pub use container::ContainerResolver;
pub use endpoint::{Endpoint, PathEndpointResolver, join_rootfs};
pub use mounts::{MarkerMatcher, MountEntry, MountTableReader, RootfsMatcher, parse_mount_table};
pub use rootfs::RootfsLocator;
