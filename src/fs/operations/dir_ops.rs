//! Single-entry mutations: create, delete, rename, chmod.
//!
//! The cache is only touched after the daemon confirms the change. A failed
//! call leaves the current snapshot exactly as it was.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::error::{Error, Result};
use crate::fs::entry::{DirectoryEntry, EntryKind};
use crate::fs::path;
use crate::fs::permissions::Mode;
use crate::manager::FileManager;

pub(crate) fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Trim a user-supplied leaf name and reject blank or multi-segment names.
pub(crate) fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidName("name cannot be empty".to_string()));
    }
    if trimmed.contains('/') {
        return Err(Error::InvalidName(format!("\"{}\" contains '/'", trimmed)));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidName(format!("\"{}\" is reserved", trimmed)));
    }
    Ok(trimmed)
}

/// Normalize the target of a delete, rename or chmod. The root and paths
/// whose last segment is not a valid name are refused.
pub(crate) fn validate_target(target: &str) -> Result<String> {
    let target = path::normalize(target);
    if target == "/" {
        return Err(Error::InvalidName(
            "the root directory cannot be modified".to_string(),
        ));
    }
    validate_name(path::file_name(&target))?;
    Ok(target)
}

impl FileManager {
    /// Create a file or folder at an absolute path.
    ///
    /// The new entry appears in the cache only once the daemon accepts it, and
    /// only if it belongs to the directory being viewed.
    pub async fn create(
        &self,
        target: &str,
        kind: EntryKind,
        content: Option<Vec<u8>>,
    ) -> Result<DirectoryEntry> {
        let target = path::normalize(target);
        let parent = path::parent(&target);
        let name = validate_name(path::file_name(&target))?;
        let target = path::join(&parent, name);

        let size = content.as_ref().map_or(0, |c| c.len() as u64);
        let stores_bytes = content.is_some();

        self.client
            .create(&self.server_id, &target, kind, content)
            .await
            .map_err(Error::into_operation_failure)?;

        let entry = DirectoryEntry::new(&target, kind, size, now_epoch());
        self.update_cache(|cache| {
            (cache.path() == parent).then(|| cache.with_entries([entry.clone()]))
        });
        info!(path = %target, kind = kind.as_str(), "created");

        if stores_bytes {
            self.invalidate_quota();
        }
        Ok(entry)
    }

    /// Create a folder in the current directory.
    pub async fn create_folder(&self, name: &str) -> Result<DirectoryEntry> {
        let name = validate_name(name)?;
        let target = path::join(&self.current_dir(), name);
        self.create(&target, EntryKind::Folder, None).await
    }

    /// Create a file with content in the current directory.
    pub async fn create_file(&self, name: &str, content: Vec<u8>) -> Result<DirectoryEntry> {
        let name = validate_name(name)?;
        let target = path::join(&self.current_dir(), name);
        self.create(&target, EntryKind::File, Some(content)).await
    }

    /// Delete one entry. It disappears from the cache only after the daemon
    /// confirms the deletion.
    pub async fn delete(&self, target: &str) -> Result<()> {
        let target = validate_target(target)?;

        self.client
            .delete(&self.server_id, &target)
            .await
            .map_err(Error::into_operation_failure)?;

        let removed = HashSet::from([target.clone()]);
        self.update_cache(|cache| cache.contains(&target).then(|| cache.without(&removed)));
        info!(path = %target, "deleted");

        self.invalidate_quota();
        Ok(())
    }

    /// Rename an entry of the current directory.
    ///
    /// Blank names fail with [`Error::InvalidName`] before anything is sent.
    /// Returns the new identity.
    pub async fn rename(&self, old_path: &str, new_name: &str) -> Result<String> {
        let new_name = validate_name(new_name)?;
        let old_path = validate_target(old_path)?;
        let new_path = path::join(&self.current_dir(), new_name);

        if new_path == old_path {
            return Ok(new_path);
        }

        self.client
            .rename(&self.server_id, &old_path, &new_path)
            .await
            .map_err(Error::into_operation_failure)?;

        self.update_cache(|cache| cache.with_renamed(&old_path, &new_path));
        info!(from = %old_path, to = %new_path, "renamed");
        Ok(new_path)
    }

    /// Change permissions. The cache does not track modes, so it is left
    /// alone.
    pub async fn chmod(&self, target: &str, mode: &str) -> Result<()> {
        let mode = Mode::parse(mode)?;
        self.chmod_mode(target, mode).await
    }

    pub async fn chmod_mode(&self, target: &str, mode: Mode) -> Result<()> {
        let target = validate_target(target)?;
        self.client
            .chmod(&self.server_id, &target, &mode.octal())
            .await
            .map_err(Error::into_operation_failure)?;
        info!(path = %target, mode = %mode, "permissions changed");
        Ok(())
    }
}
