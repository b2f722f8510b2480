//! cricp - copy files in and out of CRI containers from the host.
//!
//! A container endpoint (`name:path`) is turned into a host path by asking
//! the runtime which container the name refers to, finding that container's
//! root filesystem in the host mount table and appending the path. The two
//! resolved host paths are then handed to the host `cp`.
//!
//! ```text
//! CopyOrchestrator
//!   ├── RuntimeCapabilityGuard      (Version)
//!   └── PathEndpointResolver  ×2
//!         └── RootfsLocator
//!               ├── ContainerResolver   (ListContainers)
//!               └── MountTableReader    (/proc/mounts)
//! ```

pub mod config;
pub mod copy;
pub mod guard;
pub mod resolve;
pub mod runtime;

pub use config::{CopyOptions, CricpConfig};
pub use copy::{CopyOrchestrator, CpCommand, FileCopier};
pub use guard::RuntimeCapabilityGuard;
pub use resolve::{
    ContainerResolver, Endpoint, MarkerMatcher, MountEntry, MountTableReader,
    PathEndpointResolver, RootfsLocator, RootfsMatcher,
};
pub use runtime::{
    ContainerRecord, ContainerStatus, CriConnector, CriRuntimeService, RuntimeConnector,
    RuntimeService, RuntimeVersion,
};

pub use cricp_shared::constants;
pub use cricp_shared::{CricpError, CricpResult, Transport};
