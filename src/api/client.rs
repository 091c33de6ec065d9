//! Daemon file API: the [`RemoteFileClient`] seam and its HTTP implementation.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::fs::{path, DirectoryEntry, EntryKind};
use crate::http::HttpClient;

/// One file row as returned by the daemon's list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: i64,
}

impl RemoteFile {
    /// Convert a row listed under `dir` into a cache entry.
    ///
    /// Rows without a `path` are placed under `dir` by name, so they keep
    /// distinct identities.
    pub fn into_entry(self, dir: &str) -> DirectoryEntry {
        let identity = if self.path.trim().is_empty() {
            path::join(&path::normalize(dir), self.name.trim())
        } else {
            self.path
        };
        let mut entry = DirectoryEntry::new(&identity, self.kind, self.size, self.modified);
        if entry.name.is_empty() {
            entry.name = self.name;
        }
        entry
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: Vec<RemoteFile>,
}

/// Short-lived download link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadToken {
    #[serde(rename = "downloadUrl", alias = "download_url")]
    pub download_url: String,
}

/// Raw disk usage as reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RemoteDiskUsage {
    pub used_bytes: u64,
    #[serde(default)]
    pub limit_bytes: u64,
}

/// Remote file operations for one daemon.
///
/// Errors are expected to be already classified (see
/// [`crate::api::error::classify`]) so their `Display` text is user-facing.
#[async_trait]
pub trait RemoteFileClient: Send + Sync {
    /// List the direct children of `path`.
    async fn list(&self, server_id: &str, path: &str) -> Result<Vec<RemoteFile>>;

    /// Create a file or folder. Fails with `Conflict` if the path exists.
    async fn create(
        &self,
        server_id: &str,
        path: &str,
        kind: EntryKind,
        content: Option<Vec<u8>>,
    ) -> Result<()>;

    async fn delete(&self, server_id: &str, path: &str) -> Result<()>;

    async fn rename(&self, server_id: &str, old_path: &str, new_path: &str) -> Result<()>;

    /// Set permissions; `mode` is a 3-digit octal string.
    async fn chmod(&self, server_id: &str, path: &str, mode: &str) -> Result<()>;

    async fn download_token(&self, server_id: &str, path: &str) -> Result<DownloadToken>;

    async fn disk_usage(&self, server_id: &str) -> Result<RemoteDiskUsage>;
}

/// HTTP/JSON client for the daemon's file endpoints.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    http: HttpClient,
    base_url: String,
}

impl DaemonClient {
    /// Create a client for `base_url` using an existing HTTP client.
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an authenticated client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::with_token(&config.token, config.request_timeout())?;
        Ok(Self::new(http, &config.base_url))
    }

    fn url(&self, server_id: &str, endpoint: &str) -> String {
        format!("{}/servers/{}/{}", self.base_url, server_id, endpoint)
    }
}

#[async_trait]
impl RemoteFileClient for DaemonClient {
    async fn list(&self, server_id: &str, path: &str) -> Result<Vec<RemoteFile>> {
        debug!(server_id, path, "listing directory");
        let body = self
            .http
            .get(&self.url(server_id, "files/list"), &[("path", path)])
            .await?;
        let response: ListResponse = serde_json::from_str(&body)?;
        Ok(response.files)
    }

    async fn create(
        &self,
        server_id: &str,
        path: &str,
        kind: EntryKind,
        content: Option<Vec<u8>>,
    ) -> Result<()> {
        debug!(server_id, path, kind = kind.as_str(), "creating entry");
        let mut body = json!({ "path": path, "type": kind.as_str() });
        if let Some(content) = content {
            let (content, encoding) = encode_content(content);
            body["content"] = json!(content);
            body["encoding"] = json!(encoding);
        }
        self.http
            .post(&self.url(server_id, "files/create"), &body)
            .await?;
        Ok(())
    }

    async fn delete(&self, server_id: &str, path: &str) -> Result<()> {
        debug!(server_id, path, "deleting entry");
        self.http
            .post(&self.url(server_id, "files/delete"), &json!({ "path": path }))
            .await?;
        Ok(())
    }

    async fn rename(&self, server_id: &str, old_path: &str, new_path: &str) -> Result<()> {
        debug!(server_id, old_path, new_path, "renaming entry");
        self.http
            .post(
                &self.url(server_id, "files/rename"),
                &json!({ "from": old_path, "to": new_path }),
            )
            .await?;
        Ok(())
    }

    async fn chmod(&self, server_id: &str, path: &str, mode: &str) -> Result<()> {
        debug!(server_id, path, mode, "changing permissions");
        self.http
            .post(
                &self.url(server_id, "files/chmod"),
                &json!({ "path": path, "mode": mode }),
            )
            .await?;
        Ok(())
    }

    async fn download_token(&self, server_id: &str, path: &str) -> Result<DownloadToken> {
        let body = self
            .http
            .get(&self.url(server_id, "files/download"), &[("path", path)])
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn disk_usage(&self, server_id: &str) -> Result<RemoteDiskUsage> {
        let body = self.http.get(&self.url(server_id, "disk"), &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Text goes over the wire verbatim, binary payloads as standard base64.
fn encode_content(content: Vec<u8>) -> (String, &'static str) {
    match String::from_utf8(content) {
        Ok(text) => (text, "utf8"),
        Err(e) => (general_purpose::STANDARD.encode(e.as_bytes()), "base64"),
    }
}
