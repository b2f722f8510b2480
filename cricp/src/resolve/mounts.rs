//! Host mount table scanning.
//!
//! containerd mounts each container's root layer as an overlay whose target
//! ends in `.../<container-id>/rootfs`, e.g.
//!
//! ```text
//! overlay /run/containerd/io.containerd.runtime.v2.task/k8s.io/<id>/rootfs overlay rw,relatime,lowerdir=... 0 0
//! ```
//!
//! The table is read on every lookup; containers come and go while cricp runs.

use cricp_shared::constants::host;
use cricp_shared::{CricpError, CricpResult};
use std::path::{Path, PathBuf};

/// One line of the mount table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountEntry {
    pub source: String,
    pub target: String,
    pub fs_type: String,
    pub options: String,
}

impl MountEntry {
    /// Parse `source target type options [dump pass]`.
    ///
    /// Returns `None` for lines with fewer than four fields.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let source = fields.next()?;
        let target = fields.next()?;
        let fs_type = fields.next()?;
        let options = fields.next()?;

        Some(Self {
            source: unescape(source),
            target: unescape(target),
            fs_type: fs_type.to_string(),
            options: options.to_string(),
        })
    }
}

/// Parse a whole mount table, keeping kernel order and skipping malformed lines.
pub fn parse_mount_table(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let entry = MountEntry::parse(line);
            if entry.is_none() {
                tracing::trace!(line, "Skipping malformed mount line");
            }
            entry
        })
        .collect()
}

/// Decode the kernel's octal escapes (`\040` space, `\011` tab, `\012`
/// newline, `\134` backslash).
fn unescape(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\'
            && i + 3 < bytes.len()
            && bytes[i + 1..=i + 3].iter().all(|b| (b'0'..=b'7').contains(b))
        {
            let value = (bytes[i + 1] - b'0') as u32 * 64
                + (bytes[i + 2] - b'0') as u32 * 8
                + (bytes[i + 3] - b'0') as u32;
            if let Ok(byte) = u8::try_from(value) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Decides whether a mount entry is the root layer of a given container.
///
/// Kept separate from parsing so other runtimes' mount layouts can be
/// plugged in.
pub trait RootfsMatcher: Send + Sync {
    fn matches(&self, entry: &MountEntry, container_id: &str) -> bool;
}

/// Matches entries that mention the container id in their source or target
/// and carry a root-layer marker in any field.
#[derive(Clone, Debug)]
pub struct MarkerMatcher {
    marker: String,
}

impl MarkerMatcher {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerMatcher {
    fn default() -> Self {
        Self::new(host::ROOTFS_MARKER)
    }
}

impl RootfsMatcher for MarkerMatcher {
    fn matches(&self, entry: &MountEntry, container_id: &str) -> bool {
        let has_id = entry.source.contains(container_id) || entry.target.contains(container_id);
        let has_marker = [&entry.source, &entry.target, &entry.fs_type, &entry.options]
            .iter()
            .any(|field| field.contains(self.marker.as_str()));
        has_id && has_marker
    }
}

/// Finds a container's root filesystem mount in the host mount table.
#[derive(Clone, Debug)]
pub struct MountTableReader<M = MarkerMatcher> {
    path: PathBuf,
    matcher: M,
}

impl MountTableReader<MarkerMatcher> {
    /// Reader for the mount table at `path` with the default `rootfs` marker.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_matcher(path, MarkerMatcher::default())
    }
}

impl Default for MountTableReader<MarkerMatcher> {
    fn default() -> Self {
        Self::new(host::MOUNT_TABLE)
    }
}

impl<M: RootfsMatcher> MountTableReader<M> {
    pub fn with_matcher(path: impl Into<PathBuf>, matcher: M) -> Self {
        Self {
            path: path.into(),
            matcher,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Target of the first (earliest mounted) root layer entry for `container_id`.
    ///
    /// # Errors
    ///
    /// - `MountTable` if the table cannot be read
    /// - `RootfsNotFound` if no entry qualifies
    pub fn find_root_mount(&self, container_id: &str) -> CricpResult<String> {
        if container_id.is_empty() {
            return Err(CricpError::InvalidArgument(
                "empty container id".to_string(),
            ));
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            CricpError::MountTable(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        self.find_in(&content, container_id)
    }

    /// Same as [`find_root_mount`](Self::find_root_mount) on already-read table text.
    pub fn find_in(&self, content: &str, container_id: &str) -> CricpResult<String> {
        let entry = parse_mount_table(content)
            .into_iter()
            .find(|entry| self.matcher.matches(entry, container_id))
            .ok_or_else(|| CricpError::RootfsNotFound(container_id.to_string()))?;

        tracing::debug!(
            container_id,
            source = %entry.source,
            target = %entry.target,
            fs_type = %entry.fs_type,
            "Found rootfs mount"
        );
        Ok(entry.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "abc123";

    #[test]
    fn test_parse_entry() {
        let entry = MountEntry::parse("overlay /var/lib/rt/abc123/rootfs overlay rw,relatime 0 0")
            .unwrap();
        assert_eq!(entry.source, "overlay");
        assert_eq!(entry.target, "/var/lib/rt/abc123/rootfs");
        assert_eq!(entry.fs_type, "overlay");
        assert_eq!(entry.options, "rw,relatime");
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let table = "proc /proc proc rw 0 0\n\nbroken line\noverlay /x overlay rw\n";
        let entries = parse_mount_table(table);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].target, "/proc");
        assert_eq!(entries[1].target, "/x");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("/mnt/my\\040dir"), "/mnt/my dir");
        assert_eq!(unescape("/a\\011b\\134c"), "/a\tb\\c");
        assert_eq!(unescape("/plain"), "/plain");
        // Not an octal escape, left alone.
        assert_eq!(unescape("/odd\\09x"), "/odd\\09x");
        assert_eq!(unescape("/tail\\04"), "/tail\\04");
    }

    #[test]
    fn test_marker_matcher_requires_id_and_marker() {
        let matcher = MarkerMatcher::default();
        let rootfs = MountEntry::parse("overlay /run/c/abc123/rootfs overlay rw 0 0").unwrap();
        let shm = MountEntry::parse("shm /run/c/sandboxes/abc123/shm tmpfs rw 0 0").unwrap();
        let other = MountEntry::parse("overlay /run/c/def456/rootfs overlay rw 0 0").unwrap();

        assert!(matcher.matches(&rootfs, ID));
        assert!(!matcher.matches(&shm, ID));
        assert!(!matcher.matches(&other, ID));
    }

    #[test]
    fn test_marked_entry_wins_regardless_of_order() {
        let reader = MountTableReader::default();
        let tables = [
            "shm /run/c/abc123/shm tmpfs rw 0 0\noverlay /run/c/abc123/rootfs overlay rw 0 0\n",
            "overlay /run/c/abc123/rootfs overlay rw 0 0\nshm /run/c/abc123/shm tmpfs rw 0 0\n",
        ];
        for table in tables {
            assert_eq!(reader.find_in(table, ID).unwrap(), "/run/c/abc123/rootfs");
        }
    }

    #[test]
    fn test_first_qualifying_entry_wins() {
        let reader = MountTableReader::default();
        let table = "overlay /first/abc123/rootfs overlay rw 0 0\n\
                     overlay /second/abc123/rootfs overlay rw 0 0\n";
        assert_eq!(reader.find_in(table, ID).unwrap(), "/first/abc123/rootfs");
    }

    #[test]
    fn test_no_match_is_rootfs_not_found() {
        let reader = MountTableReader::default();
        let err = reader
            .find_in("proc /proc proc rw 0 0\n", ID)
            .unwrap_err();
        assert!(matches!(err, CricpError::RootfsNotFound(ref id) if id == ID));
    }

    #[test]
    fn test_custom_matcher() {
        struct TargetSuffix;
        impl RootfsMatcher for TargetSuffix {
            fn matches(&self, entry: &MountEntry, container_id: &str) -> bool {
                entry.target.ends_with(&format!("{}/merged", container_id))
            }
        }

        let reader = MountTableReader::with_matcher(host::MOUNT_TABLE, TargetSuffix);
        let table = "overlay /var/lib/containers/storage/overlay/abc123/merged overlay rw 0 0\n";
        assert_eq!(
            reader.find_in(table, ID).unwrap(),
            "/var/lib/containers/storage/overlay/abc123/merged"
        );
    }

    #[test]
    fn test_reads_table_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mounts");
        std::fs::write(&path, "overlay /var/lib/rt/abc123/rootfs overlay rw 0 0\n").unwrap();

        let reader = MountTableReader::new(&path);
        assert_eq!(reader.path(), path.as_path());
        assert_eq!(reader.find_root_mount(ID).unwrap(), "/var/lib/rt/abc123/rootfs");
    }

    #[test]
    fn test_missing_table_is_mount_table_error() {
        let dir = tempfile::tempdir().unwrap();
        let reader = MountTableReader::new(dir.path().join("absent"));
        let err = reader.find_root_mount(ID).unwrap_err();
        assert!(matches!(err, CricpError::MountTable(_)));
    }

    #[test]
    fn test_empty_id_rejected() {
        let reader = MountTableReader::default();
        assert!(matches!(
            reader.find_root_mount(""),
            Err(CricpError::InvalidArgument(_))
        ));
    }
}
