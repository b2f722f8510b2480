//! Test helpers for cricp.
//!
//! - [`FakeRuntime`]: in-memory runtime with call counters
//! - [`FakeConnector`]: hands out [`FakeRuntime`] connections and tracks open ones
//! - [`RecordingCopier`]: records copy requests instead of copying
//! - [`MountTable`]: mount table fixture file
//! - [`CriServer`]: real gRPC server on a Unix socket backed by a [`FakeRuntime`]

use async_trait::async_trait;
use cricp::{
    ContainerRecord, ContainerStatus, CricpError, CricpResult, FileCopier, RuntimeConnector,
    RuntimeService, RuntimeVersion,
};
use cricp_shared::runtime_service_server::RuntimeService as CriRuntimeApi;
use cricp_shared::{
    Container, ContainerMetadata, ContainerState, ListContainersRequest, ListContainersResponse,
    RuntimeServiceServer, VersionRequest, VersionResponse,
};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{NamedTempFile, TempDir};
use tokio::sync::oneshot;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::{Request, Response, Status};

// ============================================================================
// Fake runtime
// ============================================================================

#[derive(Default)]
struct FakeRuntimeState {
    runtime_name: String,
    containers: Vec<ContainerRecord>,
    version_calls: AtomicUsize,
    list_calls: AtomicUsize,
    seen_client_version: Mutex<Option<String>>,
}

/// In-memory runtime. Clones share state and counters.
#[derive(Clone)]
pub struct FakeRuntime {
    state: Arc<FakeRuntimeState>,
}

impl FakeRuntime {
    /// Runtime reporting `runtime_name` with no containers.
    pub fn new(runtime_name: &str) -> Self {
        Self {
            state: Arc::new(FakeRuntimeState {
                runtime_name: runtime_name.to_string(),
                ..Default::default()
            }),
        }
    }

    pub fn containerd() -> Self {
        Self::new("containerd")
    }

    /// Add a running container. Later containers are newer.
    pub fn with_container(self, id: &str, name: &str) -> Self {
        let created_at = self.state.containers.len() as i64 + 1;
        self.with_record(ContainerRecord::new(
            id,
            name,
            ContainerStatus::Running,
            created_at,
        ))
    }

    pub fn with_record(self, record: ContainerRecord) -> Self {
        let mut state = Arc::try_unwrap(self.state)
            .unwrap_or_else(|_| panic!("FakeRuntime must be configured before it is shared"));
        state.containers.push(record);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn version_calls(&self) -> usize {
        self.state.version_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    /// Total remote calls made against this runtime.
    pub fn remote_calls(&self) -> usize {
        self.version_calls() + self.list_calls()
    }

    pub fn seen_client_version(&self) -> Option<String> {
        self.state.seen_client_version.lock().clone()
    }
}

#[async_trait]
impl RuntimeService for FakeRuntime {
    async fn version(&self, client_version: &str) -> CricpResult<RuntimeVersion> {
        self.state.version_calls.fetch_add(1, Ordering::SeqCst);
        *self.state.seen_client_version.lock() = Some(client_version.to_string());
        Ok(RuntimeVersion {
            version: "0.1.0".to_string(),
            runtime_name: self.state.runtime_name.clone(),
            runtime_version: "1.7.13".to_string(),
            runtime_api_version: "v1".to_string(),
        })
    }

    async fn list_containers(&self) -> CricpResult<Vec<ContainerRecord>> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.containers.clone())
    }
}

// ============================================================================
// Fake connector
// ============================================================================

/// Connector handing out [`FakeRuntime`] connections.
#[derive(Clone)]
pub struct FakeConnector {
    runtime: FakeRuntime,
    connects: Arc<AtomicUsize>,
    open: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(runtime: FakeRuntime) -> Self {
        Self {
            runtime,
            connects: Arc::new(AtomicUsize::new(0)),
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn runtime(&self) -> &FakeRuntime {
        &self.runtime
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Connections handed out and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

struct FakeConnection {
    runtime: FakeRuntime,
    open: Arc<AtomicUsize>,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RuntimeService for FakeConnection {
    async fn version(&self, client_version: &str) -> CricpResult<RuntimeVersion> {
        self.runtime.version(client_version).await
    }

    async fn list_containers(&self) -> CricpResult<Vec<ContainerRecord>> {
        self.runtime.list_containers().await
    }
}

#[async_trait]
impl RuntimeConnector for FakeConnector {
    async fn connect(&self) -> CricpResult<Box<dyn RuntimeService>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            runtime: self.runtime.clone(),
            open: self.open.clone(),
        }))
    }
}

// ============================================================================
// Recording copier
// ============================================================================

/// Records `(src, dst)` pairs; optionally fails every call.
#[derive(Clone, Default)]
pub struct RecordingCopier {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    failure: Option<String>,
}

impl RecordingCopier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copier that records the call, then fails with `CricpError::Copy(message)`.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl FileCopier for RecordingCopier {
    async fn copy_file(&self, src: &str, dst: &str) -> CricpResult<()> {
        self.calls.lock().push((src.to_string(), dst.to_string()));
        match &self.failure {
            Some(message) => Err(CricpError::Copy(message.clone())),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Mount table fixture
// ============================================================================

/// Mount table written to a temporary file.
pub struct MountTable {
    file: NamedTempFile,
}

impl MountTable {
    pub fn new(lines: &[&str]) -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create mount table fixture");
        for line in lines {
            writeln!(file, "{}", line).expect("Failed to write mount table fixture");
        }
        file.flush().expect("Failed to flush mount table fixture");
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// containerd-style rootfs mount line for `target`.
pub fn overlay_line(target: &str) -> String {
    format!(
        "overlay {} overlay rw,relatime,lowerdir=/var/lib/containerd/snapshots/1/fs,upperdir=/var/lib/containerd/snapshots/2/fs,workdir=/var/lib/containerd/snapshots/2/work 0 0",
        target
    )
}

// ============================================================================
// gRPC server
// ============================================================================

struct FakeCriApi {
    runtime: FakeRuntime,
}

#[tonic::async_trait]
impl CriRuntimeApi for FakeCriApi {
    async fn version(
        &self,
        request: Request<VersionRequest>,
    ) -> Result<Response<VersionResponse>, Status> {
        let version = self
            .runtime
            .version(&request.into_inner().version)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(VersionResponse {
            version: version.version,
            runtime_name: version.runtime_name,
            runtime_version: version.runtime_version,
            runtime_api_version: version.runtime_api_version,
        }))
    }

    async fn list_containers(
        &self,
        request: Request<ListContainersRequest>,
    ) -> Result<Response<ListContainersResponse>, Status> {
        if request.into_inner().filter.is_some() {
            return Err(Status::invalid_argument("fake runtime does not filter"));
        }
        let records = self
            .runtime
            .list_containers()
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(ListContainersResponse {
            containers: records.into_iter().map(to_proto).collect(),
        }))
    }
}

fn to_proto(record: ContainerRecord) -> Container {
    let state = match record.status {
        ContainerStatus::Created => ContainerState::ContainerCreated,
        ContainerStatus::Running => ContainerState::ContainerRunning,
        ContainerStatus::Exited => ContainerState::ContainerExited,
        ContainerStatus::Unknown => ContainerState::ContainerUnknown,
    };
    Container {
        id: record.id,
        metadata: Some(ContainerMetadata {
            name: record.name,
            attempt: 0,
        }),
        state: state as i32,
        created_at: record.created_at,
        ..Default::default()
    }
}

/// CRI gRPC server on a Unix socket in a temporary directory.
///
/// Must be started inside a tokio runtime; it is shut down on drop.
pub struct CriServer {
    _dir: TempDir,
    socket_path: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
}

impl CriServer {
    pub async fn start(runtime: FakeRuntime) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create socket dir");
        let socket_path = dir.path().join("cri.sock");

        let listener =
            tokio::net::UnixListener::bind(&socket_path).expect("Failed to bind CRI socket");
        let incoming = UnixListenerStream::new(listener);
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = tonic::transport::Server::builder()
                .add_service(RuntimeServiceServer::new(FakeCriApi { runtime }))
                .serve_with_incoming_shutdown(incoming, async {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            _dir: dir,
            socket_path,
            shutdown: Some(tx),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// `unix://` endpoint URI for this server.
    pub fn endpoint(&self) -> String {
        format!("unix://{}", self.socket_path.display())
    }
}

impl Drop for CriServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
