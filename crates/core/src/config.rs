use std::path::PathBuf;
use std::time::Duration;

/// File extensions accepted before any decode attempt.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Upload size cap in bytes, checked before any filesystem work.
    pub max_file_size: u64,
    /// Duration cap in seconds, checked after decoding.
    pub max_duration: f64,
    /// Number of frames sampled for visual analysis.
    pub num_frames: usize,
    /// Whole-pipeline deadline. `None` disables the deadline.
    pub timeout: Option<Duration>,
    /// Root for scoped scratch directories. `None` uses the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024,
            max_duration: 120.0,
            num_frames: 5,
            timeout: None,
            scratch_dir: None,
        }
    }
}
