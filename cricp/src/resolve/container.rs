//! Container name pattern → container id.

use crate::runtime::{ContainerRecord, RuntimeService};
use cricp_shared::{CricpError, CricpResult};
use regex::Regex;

/// Resolves a container name pattern to exactly one container id.
///
/// The runtime is asked for every container; the pattern is applied here as
/// an unanchored regular expression over container names.
pub struct ContainerResolver<'a> {
    service: &'a dyn RuntimeService,
}

impl<'a> ContainerResolver<'a> {
    pub fn new(service: &'a dyn RuntimeService) -> Self {
        Self { service }
    }

    /// Resolve `pattern` to a container id.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `pattern` is not a valid regular expression
    /// - `NotFound` if no container name matches
    /// - `AmbiguousName` if more than one does (all of them are listed)
    pub async fn resolve(&self, pattern: &str) -> CricpResult<String> {
        let regex = Regex::new(pattern).map_err(|e| {
            CricpError::InvalidArgument(format!(
                "invalid container name pattern '{}': {}",
                pattern, e
            ))
        })?;

        let containers = self.service.list_containers().await?;
        tracing::debug!(pattern, total = containers.len(), "Listed containers");

        let mut matched = filter_by_name(containers, &regex);
        match matched.len() {
            0 => Err(CricpError::NotFound(pattern.to_string())),
            1 => {
                let record = matched.remove(0);
                tracing::debug!(
                    pattern,
                    id = %record.id,
                    name = %record.name,
                    "Resolved container"
                );
                Ok(record.id)
            }
            _ => {
                matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let matches: Vec<String> = matched.iter().map(ContainerRecord::describe).collect();
                tracing::info!(pattern, ?matches, "Container name pattern is ambiguous");
                Err(CricpError::AmbiguousName {
                    pattern: pattern.to_string(),
                    matches,
                })
            }
        }
    }
}

fn filter_by_name(containers: Vec<ContainerRecord>, regex: &Regex) -> Vec<ContainerRecord> {
    containers
        .into_iter()
        .filter(|c| regex.is_match(&c.name))
        .collect()
}
