#![allow(dead_code)]

use assert_cmd::Command;
use cricp_test_utils::{CriServer, FakeRuntime};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// `cricp` command isolated from the caller's environment.
pub fn cricp() -> Command {
    let bin_path = env!("CARGO_BIN_EXE_cricp");
    let mut cmd = Command::new(bin_path);
    cmd.timeout(Duration::from_secs(30));
    cmd.env_remove("CONTAINER_RUNTIME_ENDPOINT");
    cmd.env_remove("CRICP_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A CRI server plus a fake container rootfs on disk.
///
/// The server runs on its own tokio runtime so tests stay synchronous.
pub struct TestContext {
    pub server: CriServer,
    pub state: TempDir,
    pub mounts: PathBuf,
    // Keeps the server task alive; declared last so it drops after the server.
    _rt: tokio::runtime::Runtime,
}

impl TestContext {
    /// Server backed by `runtime`; each `(id, name)` gets a rootfs directory
    /// and a containerd-style mount line.
    pub fn new(runtime: FakeRuntime, containers: &[&str]) -> Self {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let server = rt.block_on(CriServer::start(runtime));

        let state = tempfile::tempdir().expect("Failed to create state dir");
        let mut lines = vec!["proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0".to_string()];
        for id in containers {
            let rootfs = state.path().join(id).join("rootfs");
            std::fs::create_dir_all(rootfs.join("etc")).expect("Failed to create rootfs");
            lines.push(cricp_test_utils::overlay_line(
                rootfs.to_str().expect("non-UTF-8 temp path"),
            ));
        }
        let mounts = state.path().join("mounts");
        std::fs::write(&mounts, lines.join("\n") + "\n").expect("Failed to write mount table");

        Self {
            server,
            state,
            mounts,
            _rt: rt,
        }
    }

    pub fn rootfs(&self, id: &str) -> PathBuf {
        self.state.path().join(id).join("rootfs")
    }

    /// `cricp` pointed at this context's server and mount table.
    pub fn cmd(&self) -> Command {
        let mut cmd = cricp();
        cmd.arg("--runtime-endpoint")
            .arg(self.server.endpoint())
            .arg("--mount-table")
            .arg(&self.mounts);
        cmd
    }

    pub fn mounts(&self) -> &Path {
        &self.mounts
    }
}
