//! Host copy primitive.

use async_trait::async_trait;
use cricp_shared::constants::host;
use cricp_shared::{CricpError, CricpResult};
use std::path::PathBuf;
use tokio::process::Command;

/// Copies between two host paths.
#[async_trait]
pub trait FileCopier: Send + Sync {
    async fn copy_file(&self, src: &str, dst: &str) -> CricpResult<()>;
}

/// Runs the host `cp` program.
///
/// Paths are passed as separate arguments after `--`, never through a shell.
#[derive(Clone, Debug)]
pub struct CpCommand {
    program: PathBuf,
}

impl CpCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CpCommand {
    fn default() -> Self {
        Self::new(host::COPY_PROGRAM)
    }
}

#[async_trait]
impl FileCopier for CpCommand {
    async fn copy_file(&self, src: &str, dst: &str) -> CricpResult<()> {
        tracing::debug!("copy command: {} {} {}", self.program.display(), src, dst);

        let output = Command::new(&self.program)
            .arg("--")
            .arg(src)
            .arg(dst)
            .output()
            .await
            .map_err(|e| {
                CricpError::Copy(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CricpError::Copy(format!(
                "{} {} {} failed ({}): {}",
                self.program.display(),
                src,
                dst,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
