//! cricp shared - CRI protocol types and common plumbing
//!
//! This crate contains the generated CRI `runtime.v1` client/server types,
//! the error taxonomy and the runtime endpoint transport used by both the
//! `cricp` library and the `cricp` command-line tool.

pub mod constants;
pub mod errors;
pub mod transport;

// Generated protobuf types
pub mod generated {
    #![allow(clippy::all, unused_qualifications)]
    tonic::include_proto!("runtime.v1");
}

pub use errors::{CricpError, CricpResult};
pub use transport::Transport;

// Runtime service
pub use generated::runtime_service_client::RuntimeServiceClient;
pub use generated::runtime_service_server::RuntimeServiceServer;

// All generated types
pub use generated::*;
