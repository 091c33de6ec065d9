//! Directory entry types.

use serde::{Deserialize, Serialize};

use super::path;

/// Entry kind as reported by the daemon (`"file"` or `"directory"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Directory
    #[serde(rename = "directory", alias = "folder")]
    Folder,
    /// Regular file
    #[serde(rename = "file")]
    File,
}

impl EntryKind {
    /// Check if this kind can have children.
    pub fn is_container(&self) -> bool {
        matches!(self, EntryKind::Folder)
    }

    /// Wire name used by the daemon.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Folder => "directory",
            EntryKind::File => "file",
        }
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Canonical absolute path, unique within a listing
    pub identity: String,
    /// Final path segment of `identity`
    pub name: String,
    /// Folder or file
    pub kind: EntryKind,
    /// Size in bytes (0 for folders)
    pub size: u64,
    /// Modification time (Unix epoch seconds)
    pub modified: i64,
}

impl DirectoryEntry {
    /// Build an entry from a path, deriving the name from the last segment.
    pub fn new(identity: &str, kind: EntryKind, size: u64, modified: i64) -> Self {
        let identity = path::normalize(identity);
        let name = path::file_name(&identity).to_string();
        let size = if kind.is_container() { 0 } else { size };

        Self {
            identity,
            name,
            kind,
            size,
            modified,
        }
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind.is_container()
    }

    /// Directory containing this entry.
    pub fn parent(&self) -> String {
        path::parent(&self.identity)
    }

    /// Lower-cased extension of a file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_wire_names() {
        let kind: EntryKind = serde_json::from_str("\"directory\"").unwrap();
        assert_eq!(kind, EntryKind::Folder);
        let kind: EntryKind = serde_json::from_str("\"folder\"").unwrap();
        assert_eq!(kind, EntryKind::Folder);
        let kind: EntryKind = serde_json::from_str("\"file\"").unwrap();
        assert_eq!(kind, EntryKind::File);
        assert_eq!(EntryKind::Folder.as_str(), "directory");
    }

    #[test]
    fn test_entry_derives_name() {
        let entry = DirectoryEntry::new("/plugins/Essentials/config.yml", EntryKind::File, 42, 0);
        assert_eq!(entry.name, "config.yml");
        assert_eq!(entry.parent(), "/plugins/Essentials");
        assert!(entry.is_file());
        assert_eq!(entry.extension().as_deref(), Some("yml"));
    }

    #[test]
    fn test_folder_has_no_size() {
        let entry = DirectoryEntry::new("/world/", EntryKind::Folder, 4096, 0);
        assert_eq!(entry.identity, "/world");
        assert_eq!(entry.size, 0);
        assert!(entry.is_folder());
    }

    #[test]
    fn test_extension_edge_cases() {
        let dotfile = DirectoryEntry::new("/.env", EntryKind::File, 1, 0);
        assert_eq!(dotfile.extension(), None);
        let plain = DirectoryEntry::new("/Makefile", EntryKind::File, 1, 0);
        assert_eq!(plain.extension(), None);
        let upper = DirectoryEntry::new("/logo.PNG", EntryKind::File, 1, 0);
        assert_eq!(upper.extension().as_deref(), Some("png"));
    }
}
