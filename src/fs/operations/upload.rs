//! Sequential batch uploads into the current directory.

use std::io::Cursor;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::dir_ops::{now_epoch, validate_name};
use crate::error::{Error, Result};
use crate::fs::entry::{DirectoryEntry, EntryKind};
use crate::fs::path;
use crate::fs::size::format_speed;
use crate::manager::FileManager;
use crate::progress::{ProgressCallback, UploadTask};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// One local file waiting to be uploaded.
pub struct UploadPayload {
    pub id: String,
    pub name: String,
    pub size: u64,
    content: BoxedReader,
}

impl UploadPayload {
    /// Wrap any async reader. A random task id is assigned.
    pub fn new<R>(name: impl Into<String>, size: u64, content: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            id: format!("{:016x}", rand::random::<u64>()),
            name: name.into(),
            size,
            content: Box::new(content),
        }
    }

    /// Upload in-memory data.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self::new(name, size, Cursor::new(data))
    }

    /// Upload a local file under its own file name.
    pub async fn from_path<P: AsRef<Path>>(local_path: P) -> Result<Self> {
        let local_path = local_path.as_ref();
        let name = local_path
            .file_name()
            .ok_or_else(|| {
                Error::InvalidName(format!("{} has no file name", local_path.display()))
            })?
            .to_string_lossy()
            .to_string();

        let file = tokio::fs::File::open(local_path).await?;
        let size = file.metadata().await?.len();
        Ok(Self::new(name, size, file))
    }

    /// Use a caller-chosen task id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl std::fmt::Debug for UploadPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPayload")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl FileManager {
    /// Upload files into the current directory, one at a time.
    ///
    /// See [`FileManager::upload_with_progress`].
    pub async fn upload(&self, payloads: Vec<UploadPayload>) -> Result<Vec<DirectoryEntry>> {
        self.upload_with_progress(payloads, None).await
    }

    /// Upload files into the current directory, one at a time.
    ///
    /// Each file is registered as an [`UploadTask`], read completely, then
    /// created remotely. The first failure stops the batch; files created
    /// before it are still merged into the cache and reported through
    /// [`Error::UploadAborted`]. Speed is measured over the whole batch.
    pub async fn upload_with_progress(
        &self,
        payloads: Vec<UploadPayload>,
        mut progress: Option<ProgressCallback>,
    ) -> Result<Vec<DirectoryEntry>> {
        let dir = self.current_dir();
        let total = payloads.len();
        let started = Instant::now();
        let mut uploaded_bytes = 0u64;
        let mut created: Vec<DirectoryEntry> = Vec::with_capacity(total);
        let mut failure = None;

        for payload in payloads {
            let mut task = UploadTask::new(payload.id.clone(), payload.name.clone(), payload.size);
            self.track_upload(&task);
            if let Some(cb) = progress.as_mut() {
                cb(&task);
            }

            match self.upload_one(&dir, payload).await {
                Ok(entry) => {
                    uploaded_bytes += entry.size;
                    task.complete(entry.size, format_speed(uploaded_bytes, started.elapsed()));
                    if let Some(cb) = progress.as_mut() {
                        cb(&task);
                    }
                    debug!(name = %task.name, speed = %task.speed, "upload finished");
                    self.untrack_upload(&task.id);
                    created.push(entry);
                }
                Err(e) => {
                    self.untrack_upload(&task.id);
                    warn!(name = %task.name, error = %e, "upload failed, stopping batch");
                    failure = Some(e);
                    break;
                }
            }
        }

        if !created.is_empty() {
            let merged = created.clone();
            self.update_cache(|cache| (cache.path() == dir).then(|| cache.with_entries(merged)));
            self.invalidate_quota();
            info!(dir = %dir, files = created.len(), bytes = uploaded_bytes, "uploads merged");
        }

        match failure {
            Some(e) => Err(Error::UploadAborted {
                uploaded: created.len(),
                total,
                source: Box::new(e),
            }),
            None => Ok(created),
        }
    }

    async fn upload_one(&self, dir: &str, mut payload: UploadPayload) -> Result<DirectoryEntry> {
        let name = validate_name(&payload.name)?;
        let target = path::join(dir, name);

        let mut content = Vec::new();
        payload.content.read_to_end(&mut content).await?;
        let size = content.len() as u64;

        self.client
            .create(&self.server_id, &target, EntryKind::File, Some(content))
            .await
            .map_err(Error::into_operation_failure)?;

        Ok(DirectoryEntry::new(&target, EntryKind::File, size, now_epoch()))
    }
}
