//! Directory model, caching and file operations.

pub mod cache;
pub mod entry;
pub mod operations;
pub mod path;
pub mod permissions;
pub mod quota;
pub mod size;

pub use cache::DirectoryCache;
pub use entry::{DirectoryEntry, EntryKind};
pub use operations::{open_action, BulkOperationOutcome, OpenAction, UploadPayload};
pub use permissions::{Mode, Permission};
pub use quota::{DiskQuotaTracker, DiskUsage};
