//! Configuration for cricp.
//!
//! Two layers:
//! - [`CricpConfig`]: the optional YAML file (`runtime-endpoint`, `timeout`,
//!   `debug`), merged with CLI flags by the binary.
//! - [`CopyOptions`]: the values the copy itself needs (guard token,
//!   allow-listed runtime, mount table path).

use cricp_shared::constants::{host, runtime};
use cricp_shared::{CricpError, CricpResult, Transport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config File
// ============================================================================

/// Contents of the cricp config file.
///
/// ```yaml
/// runtime-endpoint: unix:///run/containerd/containerd.sock
/// timeout: 5
/// debug: false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CricpConfig {
    /// Runtime endpoint URI.
    #[serde(default)]
    pub runtime_endpoint: Option<String>,

    /// Connect and request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,
}

impl CricpConfig {
    /// Parse a config from YAML text. Empty text yields the defaults.
    pub fn from_yaml(text: &str) -> CricpResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
            .map_err(|e| CricpError::Config(format!("invalid config: {}", e)))
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> CricpResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CricpError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text).map_err(|e| match e {
            CricpError::Config(msg) => CricpError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Load a config file if present; a missing file yields the defaults.
    pub fn load_optional(path: &Path) -> CricpResult<Self> {
        if !path.exists() {
            tracing::trace!(path = %path.display(), "No config file");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Runtime endpoint, preferring `flag` over the file over the default.
    pub fn endpoint(&self, flag: Option<&str>) -> CricpResult<Transport> {
        let uri = flag
            .or(self.runtime_endpoint.as_deref())
            .unwrap_or(runtime::DEFAULT_ENDPOINT);
        Transport::from_uri(uri).map_err(CricpError::Config)
    }

    /// Timeout, preferring `flag` over the file over the default.
    pub fn timeout(&self, flag: Option<u64>) -> Duration {
        let secs = flag
            .or(self.timeout)
            .unwrap_or(runtime::DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

// ============================================================================
// Copy Options
// ============================================================================

/// Values used by a single copy invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyOptions {
    /// Token sent in `VersionRequest`.
    pub client_version: String,

    /// Runtime name the guard accepts. Compared exactly.
    pub supported_runtime: String,

    /// Mount table scanned for container root filesystems.
    pub mount_table: PathBuf,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            client_version: runtime::CLIENT_VERSION.to_string(),
            supported_runtime: runtime::SUPPORTED_RUNTIME.to_string(),
            mount_table: PathBuf::from(host::MOUNT_TABLE),
        }
    }
}
