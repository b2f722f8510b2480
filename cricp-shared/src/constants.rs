//! Shared constants
//!
//! Defaults that both the library and the CLI fall back to when nothing is
//! configured.

/// CRI runtime constants
pub mod runtime {
    /// Runtime endpoint used when neither a flag, env var nor config file sets one.
    pub const DEFAULT_ENDPOINT: &str = "unix:///run/containerd/containerd.sock";

    /// Env var consulted for the runtime endpoint (shared with crictl).
    pub const ENDPOINT_ENV: &str = "CONTAINER_RUNTIME_ENDPOINT";

    /// API version token sent in `VersionRequest`.
    pub const CLIENT_VERSION: &str = "v1";

    /// The one runtime whose rootfs mounts are discoverable from the host mount table.
    pub const SUPPORTED_RUNTIME: &str = "containerd";

    /// Connect and per-request timeout, in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 2;
}

/// Host filesystem constants
pub mod host {
    /// Kernel mount table.
    pub const MOUNT_TABLE: &str = "/proc/mounts";

    /// Marker carried by the mount entry of a container's root layer.
    pub const ROOTFS_MARKER: &str = "rootfs";

    /// Program invoked to copy between resolved host paths.
    pub const COPY_PROGRAM: &str = "cp";
}

/// Configuration file constants
pub mod config {
    /// Config file read when `--config` is not given.
    pub const DEFAULT_PATH: &str = "/etc/cricp.yaml";

    /// Env var naming an alternative config file.
    pub const PATH_ENV: &str = "CRICP_CONFIG";
}
