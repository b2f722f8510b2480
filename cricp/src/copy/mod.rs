//! Copy dispatch.

mod orchestrator;
mod primitive;

pub use orchestrator::CopyOrchestrator;
pub use primitive::{CpCommand, FileCopier};
