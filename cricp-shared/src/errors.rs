//! Error types shared across cricp crates.
//!
//! Every failure aborts the copy; variants exist so callers (and tests) can
//! tell which step failed, not to drive recovery.

use thiserror::Error;

/// Result alias used throughout cricp.
pub type CricpResult<T> = Result<T, CricpError>;

#[derive(Debug, Error)]
pub enum CricpError {
    /// Wrong number of arguments for a command.
    #[error("usage: {0}")]
    Usage(String),

    /// No container name matched the pattern.
    #[error("no container matches pattern '{0}'")]
    NotFound(String),

    /// More than one container name matched the pattern.
    #[error(
        "container name pattern '{pattern}' matches {} containers: {}",
        matches.len(),
        matches.join(", ")
    )]
    AmbiguousName {
        pattern: String,
        matches: Vec<String>,
    },

    /// The mount table has no root layer entry for the container.
    #[error("could not find the rootfs for container {0} (is it running?)")]
    RootfsNotFound(String),

    /// The connected runtime cannot be used for host-side rootfs access.
    #[error("copy not supported for runtime '{0}'")]
    UnsupportedRuntime(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config: {0}")]
    Config(String),

    /// Reading the host mount table failed.
    #[error("mount table: {0}")]
    MountTable(String),

    /// The host copy primitive failed.
    #[error("copy: {0}")]
    Copy(String),

    /// The runtime answered with a gRPC error status.
    #[error("rpc: {0}")]
    Rpc(String),

    /// The channel to the runtime could not be established.
    #[error("rpc transport: {0}")]
    RpcTransport(String),
}

impl From<tonic::Status> for CricpError {
    fn from(status: tonic::Status) -> Self {
        CricpError::Rpc(format!("{:?}: {}", status.code(), status.message()))
    }
}

impl From<tonic::transport::Error> for CricpError {
    fn from(err: tonic::transport::Error) -> Self {
        CricpError::RpcTransport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_display_lists_matches() {
        let err = CricpError::AmbiguousName {
            pattern: "web".into(),
            matches: vec!["web (abc123)".into(), "web-canary (def456)".into()],
        };
        assert_eq!(
            err.to_string(),
            "container name pattern 'web' matches 2 containers: web (abc123), web-canary (def456)"
        );
    }

    #[test]
    fn test_unsupported_runtime_names_runtime() {
        let err = CricpError::UnsupportedRuntime("cri-o".into());
        assert_eq!(err.to_string(), "copy not supported for runtime 'cri-o'");
    }

    #[test]
    fn test_status_conversion() {
        let err: CricpError = tonic::Status::unavailable("socket closed").into();
        assert!(matches!(err, CricpError::Rpc(_)));
        assert!(err.to_string().contains("Unavailable"));
        assert!(err.to_string().contains("socket closed"));
    }
}
