//! # serverfs
//!
//! File management for a single managed server, backed by a remote daemon's
//! file API.
//!
//! ## Features
//!
//! - **Directory cache**: the current listing is held as an immutable,
//!   sorted snapshot (folders first, then case-insensitive name) that is
//!   replaced, never edited, after each confirmed change.
//! - **Mutations**: create, delete, rename and chmod. The cache is updated
//!   only once the daemon confirms the change; failures leave it untouched.
//! - **Bulk delete**: concurrent fan-out that waits for every item, reports
//!   per-item failures and re-lists the directory when anything failed.
//! - **Uploads**: sequential batch uploads with per-file progress and batch
//!   throughput, stopping at the first failure.
//! - **Disk usage**: refreshed in the background after storage changes, with
//!   a configured allocation as fallback.
//! - **Error classification**: daemon errors, including JSON bodies embedded
//!   in plain text, become readable messages such as `"foo.txt" already exists`.
//!
//! Snapshots are best-effort: call [`FileManager::refresh`] to pick up changes
//! made by anyone else.
//!
//! ## Example
//!
//! ```no_run
//! use serverfs::{Config, FileManager, UploadPayload};
//!
//! # async fn example() -> serverfs::Result<()> {
//! let config = Config::from_env()?;
//! let files = FileManager::connect(&config)?;
//!
//! files.navigate("/plugins").await?;
//! for entry in files.snapshot().entries() {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//!
//! files.create_folder("backups").await?;
//! files
//!     .upload(vec![UploadPayload::from_bytes("motd.txt", b"Welcome".to_vec())])
//!     .await?;
//!
//! let outcome = files.delete_many(&["/plugins/old.jar", "/plugins/older.jar"]).await;
//! println!("{} deleted, {} failed", outcome.success_count, outcome.failure_count);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod drag;
pub mod error;
pub mod fs;
pub mod http;
pub mod manager;
pub mod progress;

pub use api::{DaemonClient, RemoteFileClient};
pub use config::Config;
pub use drag::DragSession;
pub use error::{Error, Result};
pub use fs::{
    BulkOperationOutcome, DirectoryCache, DirectoryEntry, DiskUsage, EntryKind, Mode, OpenAction,
    Permission, UploadPayload,
};
pub use manager::FileManager;
pub use progress::{ProgressCallback, UploadTask};
