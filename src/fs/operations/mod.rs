//! File manager operations split into focused modules.

mod browse;
mod bulk;
mod dir_ops;
mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use browse::{open_action, OpenAction};
pub use bulk::BulkOperationOutcome;
pub use upload::UploadPayload;
