//! Daemon API client and error types.

pub mod client;
pub mod error;

pub use client::{DaemonClient, DownloadToken, RemoteDiskUsage, RemoteFile, RemoteFileClient};
pub use error::{classify, RemoteErrorKind};
