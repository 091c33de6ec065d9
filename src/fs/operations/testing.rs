//! In-memory daemon used by the operation tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::api::{classify, DownloadToken, RemoteDiskUsage, RemoteFile, RemoteFileClient};
use crate::config::Config;
use crate::error::Result;
use crate::fs::{path, EntryKind};
use crate::manager::FileManager;

/// A call the mock received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Create(String, EntryKind, Option<Vec<u8>>),
    Delete(String),
    Rename(String, String),
    Chmod(String, String),
    DownloadToken(String),
    DiskUsage,
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, RemoteFile>,
    failures: HashMap<String, String>,
    calls: Vec<Call>,
    disk: Option<(u64, u64)>,
    /// Delayed disk usage answers, consumed one per call before `disk`
    disk_script: VecDeque<(Duration, u64, u64)>,
    delete_barrier: Option<Arc<Barrier>>,
}

#[derive(Default)]
pub struct MockClient {
    state: Mutex<State>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, path: &str, kind: EntryKind, size: u64) {
        let path = path::normalize(path);
        let file = RemoteFile {
            name: path::file_name(&path).to_string(),
            path: path.clone(),
            kind,
            size,
            modified: 1_700_000_000,
        };
        self.state.lock().unwrap().files.insert(path, file);
    }

    /// Every operation touching `path` fails with `raw` as the daemon's text.
    pub fn fail(&self, path: &str, raw: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(path.to_string(), raw.to_string());
    }

    pub fn set_disk_usage(&self, used: u64, limit: u64) {
        self.state.lock().unwrap().disk = Some((used, limit));
    }

    pub fn fail_disk_usage(&self) {
        self.state.lock().unwrap().disk = None;
    }

    /// Answer the next disk usage call with `(used, limit)` after `delay`.
    pub fn script_disk_usage(&self, delay: Duration, used: u64, limit: u64) {
        self.state
            .lock()
            .unwrap()
            .disk_script
            .push_back((delay, used, limit));
    }

    /// Hold every delete until `n` deletes are in flight at once.
    pub fn set_delete_barrier(&self, n: usize) {
        self.state.lock().unwrap().delete_barrier = Some(Arc::new(Barrier::new(n)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls excluding the background disk usage polls.
    pub fn file_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::DiskUsage)
            .collect()
    }

    pub fn disk_polls(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::DiskUsage).count()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List(_)))
            .count()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    fn record(&self, call: Call, path: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get(path) {
            Some(raw) => Err(classify(raw)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteFileClient for MockClient {
    async fn list(&self, _server_id: &str, dir: &str) -> Result<Vec<RemoteFile>> {
        self.record(Call::List(dir.to_string()), dir)?;
        let dir = path::normalize(dir);
        let state = self.state.lock().unwrap();
        Ok(state
            .files
            .values()
            .filter(|f| path::parent(&f.path) == dir && f.path != "/")
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        _server_id: &str,
        target: &str,
        kind: EntryKind,
        content: Option<Vec<u8>>,
    ) -> Result<()> {
        let size = content.as_ref().map_or(0, |c| c.len() as u64);
        self.record(Call::Create(target.to_string(), kind, content), target)?;
        if self.exists(target) {
            return Err(classify(&format!(
                r#"{{"error":"Conflict","message":"Already exists: {}"}}"#,
                path::file_name(target)
            )));
        }
        self.add(target, kind, size);
        Ok(())
    }

    async fn delete(&self, _server_id: &str, target: &str) -> Result<()> {
        let barrier = self.state.lock().unwrap().delete_barrier.clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        self.record(Call::Delete(target.to_string()), target)?;
        self.state.lock().unwrap().files.remove(target);
        Ok(())
    }

    async fn rename(&self, _server_id: &str, old_path: &str, new_path: &str) -> Result<()> {
        self.record(Call::Rename(old_path.to_string(), new_path.to_string()), old_path)?;
        let mut state = self.state.lock().unwrap();
        if let Some(mut file) = state.files.remove(old_path) {
            file.path = new_path.to_string();
            file.name = path::file_name(new_path).to_string();
            state.files.insert(new_path.to_string(), file);
        }
        Ok(())
    }

    async fn chmod(&self, _server_id: &str, target: &str, mode: &str) -> Result<()> {
        self.record(Call::Chmod(target.to_string(), mode.to_string()), target)
    }

    async fn download_token(&self, _server_id: &str, target: &str) -> Result<DownloadToken> {
        self.record(Call::DownloadToken(target.to_string()), target)?;
        Ok(DownloadToken {
            download_url: format!("https://node.test/download?file={}", target),
        })
    }

    async fn disk_usage(&self, _server_id: &str) -> Result<RemoteDiskUsage> {
        let (scripted, disk) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::DiskUsage);
            (state.disk_script.pop_front(), state.disk)
        };
        let disk = match scripted {
            Some((delay, used, limit)) => {
                tokio::time::sleep(delay).await;
                Some((used, limit))
            }
            None => disk,
        };
        match disk {
            Some((used_bytes, limit_bytes)) => Ok(RemoteDiskUsage {
                used_bytes,
                limit_bytes,
            }),
            None => Err(classify("disk usage endpoint unavailable")),
        }
    }
}

/// Let spawned background refreshes run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Manager over a fresh mock, with a fallback allocation of 1 MiB.
pub fn manager() -> (Arc<MockClient>, FileManager) {
    let client = Arc::new(MockClient::new());
    let config = Config::new("https://node.test", "token", "srv").with_allocation(1024 * 1024);
    let manager = FileManager::new(client.clone(), &config);
    (client, manager)
}
