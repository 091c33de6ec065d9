//! Progress reporting for uploads.

/// One upload in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    /// Opaque id, unique per task
    pub id: String,
    /// Name of the file being uploaded
    pub name: String,
    /// Bytes to upload
    pub total_bytes: u64,
    /// Bytes uploaded so far
    pub uploaded_bytes: u64,
    /// 0 to 100
    pub progress_percent: u8,
    /// Batch throughput, e.g. `"1.5 MB/s"`
    pub speed: String,
}

impl UploadTask {
    /// Register a task at 0%.
    pub fn new(id: impl Into<String>, name: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_bytes,
            uploaded_bytes: 0,
            progress_percent: 0,
            speed: "0 KB/s".to_string(),
        }
    }

    /// Record bytes sent so far.
    pub fn advance(&mut self, uploaded_bytes: u64) {
        self.uploaded_bytes = uploaded_bytes;
        self.progress_percent = percent(uploaded_bytes, self.total_bytes);
    }

    /// Mark the task done at 100%.
    pub fn complete(&mut self, uploaded_bytes: u64, speed: String) {
        self.uploaded_bytes = uploaded_bytes;
        self.progress_percent = 100;
        self.speed = speed;
    }

    /// Check if upload is complete.
    pub fn is_complete(&self) -> bool {
        self.progress_percent >= 100
    }
}

fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as u8
}

/// Type alias for progress callback function.
///
/// The callback sees every state change of every task in a batch.
pub type ProgressCallback = Box<dyn FnMut(&UploadTask) + Send>;
