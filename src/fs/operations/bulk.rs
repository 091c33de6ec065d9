//! Bulk deletion with all-settle semantics.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{info, warn};

use super::dir_ops::validate_target;
use crate::error::{Error, Result};
use crate::manager::FileManager;

/// Aggregate result of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOperationOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    /// Identities the daemon confirmed
    pub succeeded: HashSet<String>,
    /// `(identity, message)` for every item that failed
    pub failures: Vec<(String, String)>,
}

impl BulkOperationOutcome {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn is_complete_success(&self) -> bool {
        self.failure_count == 0
    }

    /// `Ok(self)` when every item succeeded, otherwise
    /// [`Error::PartialFailure`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete_success() {
            Ok(self)
        } else {
            Err(Error::PartialFailure {
                succeeded: self.success_count,
                total: self.total(),
            })
        }
    }
}

impl FileManager {
    /// Delete every selected entry concurrently and wait for all of them.
    ///
    /// One failure never stops the others. Confirmed deletions are removed
    /// from the cache in a single replacement; if anything failed the
    /// directory is re-listed once, since the cache can no longer be trusted.
    /// Root or blank targets are reported as failures without a remote call.
    pub async fn delete_many<S: AsRef<str>>(&self, targets: &[S]) -> BulkOperationOutcome {
        let mut outcome = BulkOperationOutcome::default();
        let mut seen = HashSet::new();
        let mut valid = Vec::with_capacity(targets.len());
        for raw in targets {
            let raw = raw.as_ref();
            match validate_target(raw) {
                Ok(target) => {
                    if seen.insert(target.clone()) {
                        valid.push(target);
                    }
                }
                // Never sent, so the cache is still accurate for these.
                Err(e) => {
                    outcome.failure_count += 1;
                    outcome.failures.push((raw.to_string(), e.to_string()));
                }
            }
        }

        if valid.is_empty() {
            return outcome;
        }

        let results = join_all(
            valid
                .iter()
                .map(|target| self.client.delete(&self.server_id, target)),
        )
        .await;

        let mut remote_failures = 0;
        for (target, result) in valid.into_iter().zip(results) {
            match result {
                Ok(()) => {
                    outcome.success_count += 1;
                    outcome.succeeded.insert(target);
                }
                Err(e) => {
                    remote_failures += 1;
                    outcome.failure_count += 1;
                    outcome
                        .failures
                        .push((target, e.into_operation_failure().to_string()));
                }
            }
        }

        if !outcome.succeeded.is_empty() {
            let succeeded = &outcome.succeeded;
            self.update_cache(|cache| {
                succeeded
                    .iter()
                    .any(|id| cache.contains(id))
                    .then(|| cache.without(succeeded))
            });
            self.invalidate_quota();
        }

        if outcome.is_complete_success() {
            info!(deleted = outcome.success_count, "bulk delete finished");
        } else {
            warn!(
                succeeded = outcome.success_count,
                failed = outcome.failure_count,
                "bulk delete partially failed"
            );
        }
        if remote_failures > 0 {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "re-list after bulk delete failed");
            }
        }

        outcome
    }
}
