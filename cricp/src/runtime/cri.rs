//! gRPC implementation of [`RuntimeService`] against a CRI `runtime.v1` endpoint.

use super::{
    Connection, ContainerRecord, ContainerStatus, RuntimeConnector, RuntimeService,
    RuntimeVersion,
};
use async_trait::async_trait;
use cricp_shared::{
    Container, ContainerState, CricpResult, ListContainersRequest, RuntimeServiceClient,
    Transport, VersionRequest,
};
use std::time::Duration;
use tonic::transport::Channel;

/// CRI runtime service client.
pub struct CriRuntimeService {
    client: RuntimeServiceClient<Channel>,
}

impl CriRuntimeService {
    /// Create from a channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            client: RuntimeServiceClient::new(channel),
        }
    }
}

impl Drop for CriRuntimeService {
    fn drop(&mut self) {
        tracing::trace!("Closing runtime connection");
    }
}

#[async_trait]
impl RuntimeService for CriRuntimeService {
    async fn version(&self, client_version: &str) -> CricpResult<RuntimeVersion> {
        let request = VersionRequest {
            version: client_version.to_string(),
        };

        let response = self.client.clone().version(request).await?.into_inner();
        tracing::trace!(
            runtime_name = %response.runtime_name,
            runtime_version = %response.runtime_version,
            api_version = %response.runtime_api_version,
            "VersionResponse"
        );

        Ok(RuntimeVersion {
            version: response.version,
            runtime_name: response.runtime_name,
            runtime_version: response.runtime_version,
            runtime_api_version: response.runtime_api_version,
        })
    }

    async fn list_containers(&self) -> CricpResult<Vec<ContainerRecord>> {
        let request = ListContainersRequest { filter: None };

        let response = self
            .client
            .clone()
            .list_containers(request)
            .await?
            .into_inner();
        tracing::trace!(count = response.containers.len(), "ListContainersResponse");

        Ok(response.containers.into_iter().map(to_record).collect())
    }
}

fn to_record(container: Container) -> ContainerRecord {
    let status = match ContainerState::try_from(container.state) {
        Ok(ContainerState::ContainerCreated) => ContainerStatus::Created,
        Ok(ContainerState::ContainerRunning) => ContainerStatus::Running,
        Ok(ContainerState::ContainerExited) => ContainerStatus::Exited,
        Ok(ContainerState::ContainerUnknown) | Err(_) => ContainerStatus::Unknown,
    };

    ContainerRecord {
        id: container.id,
        name: container.metadata.map(|m| m.name).unwrap_or_default(),
        status,
        created_at: container.created_at,
    }
}

/// Connects to a CRI endpoint over the configured [`Transport`].
#[derive(Clone, Debug)]
pub struct CriConnector {
    connection: Connection,
}

impl CriConnector {
    pub fn new(transport: Transport, timeout: Duration) -> Self {
        Self {
            connection: Connection::new(transport, timeout),
        }
    }
}

#[async_trait]
impl RuntimeConnector for CriConnector {
    async fn connect(&self) -> CricpResult<Box<dyn RuntimeService>> {
        tracing::debug!(endpoint = %self.connection.transport(), "Connecting to runtime");
        let channel = self.connection.channel().await?;
        Ok(Box::new(CriRuntimeService::new(channel)))
    }
}
