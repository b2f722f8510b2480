//! Connection management.
//!
//! Converts a [`Transport`] into a tonic [`Channel`] with the configured
//! timeout applied to both connecting and every request.

use cricp_shared::{CricpResult, Transport};
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

/// Connection settings for the runtime endpoint.
#[derive(Clone, Debug)]
pub struct Connection {
    transport: Transport,
    timeout: Duration,
}

impl Connection {
    pub fn new(transport: Transport, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Establish the channel.
    pub async fn channel(&self) -> CricpResult<Channel> {
        match &self.transport {
            Transport::Unix { socket_path } => {
                tracing::debug!("Connecting via Unix: {}", socket_path.display());
                connect_unix(socket_path, self.timeout).await
            }
            Transport::Tcp { host, port } => {
                tracing::debug!("Connecting via TCP: {}:{}", host, port);
                connect_tcp(host, *port, self.timeout).await
            }
        }
    }
}

async fn connect_unix(socket_path: &std::path::Path, timeout: Duration) -> CricpResult<Channel> {
    let socket_path = socket_path.to_path_buf();

    // The URI is required by tonic but ignored by the connector.
    let channel = Endpoint::try_from("http://[::]:50051")?
        .connect_timeout(timeout)
        .timeout(timeout)
        .connect_with_connector(service_fn(move |_: Uri| {
            let socket_path = socket_path.clone();
            async move {
                let stream = tokio::net::UnixStream::connect(socket_path).await?;
                Ok::<_, std::io::Error>(TokioIo::new(stream))
            }
        }))
        .await?;

    tracing::debug!("Connected via Unix socket");
    Ok(channel)
}

async fn connect_tcp(host: &str, port: u16, timeout: Duration) -> CricpResult<Channel> {
    let addr = format!("http://{}:{}", host, port);
    let channel = Endpoint::try_from(addr)?
        .connect_timeout(timeout)
        .timeout(timeout)
        .connect()
        .await?;

    tracing::debug!("Connected via TCP");
    Ok(channel)
}
