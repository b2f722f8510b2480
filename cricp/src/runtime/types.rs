//! Runtime-reported records, decoupled from the generated protobuf types.

use std::fmt;

/// Lifecycle state of a container as reported by the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    Running,
    Exited,
    Unknown,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerStatus::Created => "created",
            ContainerStatus::Running => "running",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One entry of a `ListContainers` response.
///
/// Only lives for the duration of a single name resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub status: ContainerStatus,
    /// Creation time in nanoseconds since the epoch.
    pub created_at: i64,
}

impl ContainerRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: ContainerStatus,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            created_at,
        }
    }

    /// `name (id, state)`, used when listing ambiguous matches.
    pub fn describe(&self) -> String {
        format!("{} ({}, {})", self.name, self.id, self.status)
    }
}

/// Identity of the connected runtime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeVersion {
    pub version: String,
    pub runtime_name: String,
    pub runtime_version: String,
    pub runtime_api_version: String,
}
