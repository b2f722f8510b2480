//! Access to the CRI runtime service.
//!
//! The resolution code only sees [`RuntimeService`]; the gRPC client in
//! [`cri`] is one implementation and the test fakes are another.

mod connection;
mod cri;
mod types;

pub use connection::Connection;
pub use cri::{CriConnector, CriRuntimeService};
pub use types::{ContainerRecord, ContainerStatus, RuntimeVersion};

use async_trait::async_trait;
use cricp_shared::CricpResult;

/// The two runtime calls a copy needs.
#[async_trait]
pub trait RuntimeService: Send + Sync {
    /// Query runtime name and version, sending `client_version` as the API token.
    async fn version(&self, client_version: &str) -> CricpResult<RuntimeVersion>;

    /// List every container the runtime knows about (no server-side filter).
    async fn list_containers(&self) -> CricpResult<Vec<ContainerRecord>>;
}

/// Produces a live [`RuntimeService`].
///
/// The returned service owns the connection; dropping it closes the channel.
#[async_trait]
pub trait RuntimeConnector: Send + Sync {
    async fn connect(&self) -> CricpResult<Box<dyn RuntimeService>>;
}
