use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A resolved file identity produced by enumeration.
///
/// Entries are caller-owned snapshots; the reader keeps no reference to them
/// and an entry has no identity beyond its path within one enumeration.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the package root.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, when the filesystem reports one.
    pub modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    /// File name component of the entry's relative path.
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or("")
    }
}
