//! The file manager for one server.
//!
//! `FileManager` owns the state the presentation layer renders: the current
//! directory snapshot, the active upload set and the disk usage. Each is held
//! in a `watch` channel and only ever replaced as a whole, so operations can
//! take `&self` and run concurrently without corrupting each other's view.
//! The operations themselves live in `fs::operations`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{DaemonClient, RemoteFileClient};
use crate::config::Config;
use crate::error::Result;
use crate::fs::{DirectoryCache, DiskQuotaTracker, DiskUsage};
use crate::progress::UploadTask;

pub struct FileManager {
    pub(crate) client: Arc<dyn RemoteFileClient>,
    pub(crate) server_id: String,
    pub(crate) cache: watch::Sender<Arc<DirectoryCache>>,
    pub(crate) uploads: watch::Sender<Vec<UploadTask>>,
    pub(crate) quota: DiskQuotaTracker,
}

impl FileManager {
    /// Create a manager over any client. The cache starts as an empty root
    /// listing; call [`FileManager::navigate`] to load it.
    pub fn new(client: Arc<dyn RemoteFileClient>, config: &Config) -> Self {
        let quota = DiskQuotaTracker::new(
            client.clone(),
            config.server_id.clone(),
            config.allocation_bytes,
        );
        let (cache, _) = watch::channel(Arc::new(DirectoryCache::empty("/")));
        let (uploads, _) = watch::channel(Vec::new());

        Self {
            client,
            server_id: config.server_id.clone(),
            cache,
            uploads,
            quota,
        }
    }

    /// Create a manager talking HTTP to the configured daemon.
    pub fn connect(config: &Config) -> Result<Self> {
        let client = DaemonClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Current directory snapshot.
    pub fn snapshot(&self) -> Arc<DirectoryCache> {
        self.cache.borrow().clone()
    }

    /// Path of the directory being viewed.
    pub fn current_dir(&self) -> String {
        self.cache.borrow().path().to_string()
    }

    /// Observe every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DirectoryCache>> {
        self.cache.subscribe()
    }

    /// Uploads currently in flight.
    pub fn active_uploads(&self) -> Vec<UploadTask> {
        self.uploads.borrow().clone()
    }

    pub fn subscribe_uploads(&self) -> watch::Receiver<Vec<UploadTask>> {
        self.uploads.subscribe()
    }

    /// Last known disk usage.
    pub fn disk_usage(&self) -> DiskUsage {
        self.quota.current()
    }

    pub fn quota(&self) -> &DiskQuotaTracker {
        &self.quota
    }

    /// Replace the snapshot wholesale.
    pub(crate) fn publish(&self, cache: DirectoryCache) {
        self.cache.send_replace(Arc::new(cache));
    }

    /// Derive a new snapshot from the current one. `derive` returns `None`
    /// when nothing changes, in which case subscribers are not woken.
    pub(crate) fn update_cache(
        &self,
        derive: impl FnOnce(&DirectoryCache) -> Option<DirectoryCache>,
    ) {
        self.cache.send_if_modified(|current| match derive(&**current) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        });
    }

    /// Add or update a task in the active set.
    pub(crate) fn track_upload(&self, task: &UploadTask) {
        self.uploads.send_modify(|tasks| {
            match tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => *existing = task.clone(),
                None => tasks.push(task.clone()),
            }
        });
    }

    pub(crate) fn untrack_upload(&self, id: &str) {
        self.uploads.send_modify(|tasks| tasks.retain(|t| t.id != id));
    }

    /// Kick off a background disk usage refresh; failures are logged by the
    /// tracker and never reach the caller.
    pub(crate) fn invalidate_quota(&self) {
        let _ = self.quota.spawn_refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::operations::testing::MockClient;

    #[test]
    fn test_connect_builds_http_client() {
        let config = Config::new("https://node.example", "token", "srv");
        let manager = FileManager::connect(&config).unwrap();
        assert_eq!(manager.server_id(), "srv");
        assert_eq!(manager.current_dir(), "/");
        assert!(manager.snapshot().is_empty());
    }

    #[test]
    fn test_upload_tracking() {
        let config = Config::new("https://node.example", "token", "srv");
        let manager = FileManager::new(Arc::new(MockClient::new()), &config);

        let mut task = UploadTask::new("a", "a.txt", 10);
        manager.track_upload(&task);
        task.advance(5);
        manager.track_upload(&task);
        assert_eq!(manager.active_uploads(), vec![task]);

        manager.untrack_upload("a");
        assert!(manager.active_uploads().is_empty());
    }

    #[test]
    fn test_update_cache_skips_unchanged() {
        let config = Config::new("https://node.example", "token", "srv");
        let manager = FileManager::new(Arc::new(MockClient::new()), &config);
        let mut rx = manager.subscribe();

        manager.update_cache(|_| None);
        assert!(!rx.has_changed().unwrap());

        manager.update_cache(|_| Some(DirectoryCache::empty("/logs")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().path(), "/logs");
    }
}
