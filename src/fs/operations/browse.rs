//! Directory navigation and read-only helpers.

use tracing::info;

use crate::error::{Error, Result};
use crate::fs::cache::DirectoryCache;
use crate::fs::entry::DirectoryEntry;
use crate::fs::path;
use crate::manager::FileManager;

const EDITABLE_EXTENSIONS: &[&str] = &[
    "txt", "log", "md", "json", "yml", "yaml", "toml", "ini", "cfg", "conf", "properties",
    "xml", "html", "css", "js", "ts", "sh", "bat", "py", "lua", "java", "rs", "env", "sk",
];

const PREVIEW_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "mp3", "ogg", "wav", "mp4", "webm",
];

/// What opening an entry should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    /// Folder: navigate into it
    Navigate(String),
    /// Text or code file: hand to the editor
    Edit(String),
    /// Image, audio or video: hand to the previewer
    Preview(String),
    /// Anything else: offer a download
    Download(String),
}

/// Decide how an entry is opened.
pub fn open_action(entry: &DirectoryEntry) -> OpenAction {
    let target = entry.identity.clone();
    if entry.is_folder() {
        return OpenAction::Navigate(target);
    }

    match entry.extension().as_deref() {
        Some(ext) if EDITABLE_EXTENSIONS.contains(&ext) => OpenAction::Edit(target),
        Some(ext) if PREVIEW_EXTENSIONS.contains(&ext) => OpenAction::Preview(target),
        // Extensionless files are usually scripts or configs.
        None => OpenAction::Edit(target),
        Some(_) => OpenAction::Download(target),
    }
}

impl FileManager {
    /// List a directory and make it the current one.
    ///
    /// The previous snapshot is discarded wholesale. On failure it is kept.
    pub async fn navigate(&self, dir: &str) -> Result<()> {
        let dir = path::normalize(dir);
        let files = self
            .client
            .list(&self.server_id, &dir)
            .await
            .map_err(Error::into_operation_failure)?;

        let entries: Vec<DirectoryEntry> =
            files.into_iter().map(|f| f.into_entry(&dir)).collect();
        let cache = DirectoryCache::new(&dir, entries);
        info!(path = %dir, entries = cache.len(), "directory loaded");
        self.publish(cache);

        self.invalidate_quota();
        Ok(())
    }

    /// Re-list the current directory from the daemon.
    pub async fn refresh(&self) -> Result<()> {
        self.navigate(&self.current_dir()).await
    }

    /// Navigate to the parent directory.
    pub async fn up(&self) -> Result<()> {
        self.navigate(&path::parent(&self.current_dir())).await
    }

    /// `(label, path)` pairs for the current directory's ancestors.
    pub fn breadcrumbs(&self) -> Vec<(String, String)> {
        path::breadcrumb_trail(&self.current_dir())
    }

    /// Ask the daemon for a one-off download link.
    pub async fn download_url(&self, target: &str) -> Result<String> {
        let target = path::normalize(target);
        let token = self
            .client
            .download_token(&self.server_id, &target)
            .await
            .map_err(Error::into_operation_failure)?;
        Ok(token.download_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::EntryKind;
    use crate::fs::operations::testing::{manager, settle};
    use crate::fs::DiskUsage;

    #[test]
    fn test_open_action() {
        let folder = DirectoryEntry::new("/plugins", EntryKind::Folder, 0, 0);
        assert_eq!(open_action(&folder), OpenAction::Navigate("/plugins".into()));

        let props = DirectoryEntry::new("/server.properties", EntryKind::File, 1, 0);
        assert_eq!(open_action(&props), OpenAction::Edit("/server.properties".into()));

        let icon = DirectoryEntry::new("/server-icon.PNG", EntryKind::File, 1, 0);
        assert_eq!(open_action(&icon), OpenAction::Preview("/server-icon.PNG".into()));

        let jar = DirectoryEntry::new("/server.jar", EntryKind::File, 1, 0);
        assert_eq!(open_action(&jar), OpenAction::Download("/server.jar".into()));

        let script = DirectoryEntry::new("/start", EntryKind::File, 1, 0);
        assert_eq!(open_action(&script), OpenAction::Edit("/start".into()));
    }

    #[tokio::test]
    async fn test_navigate_replaces_snapshot() {
        let (client, manager) = manager();
        client.add("/logs", EntryKind::Folder, 0);
        client.add("/eula.txt", EntryKind::File, 10);
        client.add("/logs/latest.log", EntryKind::File, 99);

        manager.navigate("/").await.unwrap();
        assert_eq!(manager.snapshot().len(), 2);
        assert_eq!(manager.snapshot().entries()[0].name, "logs");

        manager.navigate("logs/").await.unwrap();
        let snapshot = manager.snapshot();
        assert_eq!(snapshot.path(), "/logs");
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("/logs/latest.log"));
        assert_eq!(
            manager.breadcrumbs(),
            vec![("logs".to_string(), "/logs".to_string())]
        );

        manager.up().await.unwrap();
        assert_eq!(manager.current_dir(), "/");
    }

    #[tokio::test]
    async fn test_navigate_failure_keeps_snapshot() {
        let (client, manager) = manager();
        client.add("/a.txt", EntryKind::File, 1);
        manager.navigate("/").await.unwrap();

        client.fail("/secret", r#"{"error":"Forbidden","message":"Access denied"}"#);
        let err = manager.navigate("/secret").await.unwrap_err();
        assert_eq!(err.to_string(), "Access denied");
        assert_eq!(manager.current_dir(), "/");
        assert!(manager.snapshot().contains("/a.txt"));
    }

    #[tokio::test]
    async fn test_navigate_refreshes_quota() {
        let (client, manager) = manager();
        client.set_disk_usage(512, 2048);
        manager.navigate("/").await.unwrap();
        settle().await;

        assert_eq!(client.disk_polls(), 1);
        assert_eq!(manager.disk_usage(), DiskUsage { used: 512, total: 2048 });
        assert_eq!(manager.disk_usage().percent(), 25.0);
    }

    #[tokio::test]
    async fn test_download_url() {
        let (_client, manager) = manager();
        let url = manager.download_url("/world.zip").await.unwrap();
        assert_eq!(url, "https://node.test/download?file=/world.zip");
    }
}
