//! Disk usage tracking for the managed server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::RemoteFileClient;

/// Used and total disk space in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskUsage {
    /// Used storage in bytes
    pub used: u64,
    /// Total storage in bytes (0 when unknown)
    pub total: u64,
}

impl DiskUsage {
    /// Get free storage in bytes.
    pub fn free(&self) -> u64 {
        self.total.saturating_sub(self.used)
    }

    /// Usage percentage for display, clamped to `[0, 100]`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.used as f64 / self.total as f64) * 100.0).clamp(0.0, 100.0)
    }
}

/// Polls the daemon for disk usage and publishes the latest value.
///
/// Cloning is cheap; clones share the published value.
#[derive(Clone)]
pub struct DiskQuotaTracker {
    client: Arc<dyn RemoteFileClient>,
    server_id: String,
    allocation_bytes: Option<u64>,
    usage: Arc<watch::Sender<DiskUsage>>,
    /// Last request number handed out
    requested: Arc<AtomicU64>,
    /// Request number of the published value
    published: Arc<AtomicU64>,
}

impl DiskQuotaTracker {
    pub fn new(
        client: Arc<dyn RemoteFileClient>,
        server_id: impl Into<String>,
        allocation_bytes: Option<u64>,
    ) -> Self {
        let (usage, _) = watch::channel(DiskUsage::default());
        Self {
            client,
            server_id: server_id.into(),
            allocation_bytes,
            usage: Arc::new(usage),
            requested: Arc::new(AtomicU64::new(0)),
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Last published value.
    pub fn current(&self) -> DiskUsage {
        *self.usage.borrow()
    }

    /// Receiver that observes every refresh.
    pub fn subscribe(&self) -> watch::Receiver<DiskUsage> {
        self.usage.subscribe()
    }

    /// Fetch usage from the daemon. Never fails: on error the configured
    /// allocation (or zero) is used as the total.
    ///
    /// Returns this request's value. It is only published if no later
    /// request has published first.
    pub async fn refresh(&self) -> DiskUsage {
        let ticket = self.next_ticket();
        self.fetch(ticket).await
    }

    /// Refresh in the background without blocking the caller. Requests are
    /// ordered by call, not by completion.
    pub fn spawn_refresh(&self) -> tokio::task::JoinHandle<DiskUsage> {
        let tracker = self.clone();
        let ticket = self.next_ticket();
        tokio::spawn(async move { tracker.fetch(ticket).await })
    }

    fn next_ticket(&self) -> u64 {
        self.requested.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fetch(&self, ticket: u64) -> DiskUsage {
        let usage = match self.client.disk_usage(&self.server_id).await {
            Ok(remote) => DiskUsage {
                used: remote.used_bytes,
                total: if remote.limit_bytes > 0 {
                    remote.limit_bytes
                } else {
                    self.allocation_bytes.unwrap_or(0)
                },
            },
            Err(e) => {
                warn!(server_id = %self.server_id, error = %e, "disk usage unavailable, using fallback");
                DiskUsage {
                    used: 0,
                    total: self.allocation_bytes.unwrap_or(0),
                }
            }
        };

        // The sender's lock serializes the ticket check.
        let published = self.usage.send_if_modified(|current| {
            if self.published.load(Ordering::SeqCst) > ticket {
                return false;
            }
            self.published.store(ticket, Ordering::SeqCst);
            *current = usage;
            true
        });
        if published {
            debug!(used = usage.used, total = usage.total, "disk usage refreshed");
        } else {
            debug!(ticket, "stale disk usage response dropped");
        }
        usage
    }
}
