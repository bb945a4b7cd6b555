use thiserror::Error;

/// Fatal pipeline errors. Stage-internal failures never surface here; they
/// are absorbed into degraded defaults at the stage boundary.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported file format: {filename}. Please upload MP4, MOV, or AVI files.")]
    UnsupportedFormat { filename: String },

    #[error("Video too long: {duration:.1}s exceeds the {max:.0}s limit")]
    VideoTooLong { duration: f64, max: f64 },

    #[error("Processing timed out after {seconds:.0}s")]
    Timeout { seconds: f64 },

    #[error("Video decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    /// True for errors caused by the uploaded file itself (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProcessError::FileTooLarge { .. }
                | ProcessError::UnsupportedFormat { .. }
                | ProcessError::VideoTooLong { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to probe video: {reason}")]
    ProbeFailed { reason: String },

    #[error("failed to extract audio: {reason}")]
    AudioExtractionFailed { reason: String },

    #[error("failed to extract frame at {timestamp:.2}s: {reason}")]
    FrameExtractionFailed { timestamp: f64, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech engine failed: {reason}")]
    EngineFailed { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("frame scoring failed: {reason}")]
    ScoringFailed { reason: String },

    #[error("scorer returned {got} scores for {expected} prompts")]
    ScoreShapeMismatch { expected: usize, got: usize },
}

#[derive(Error, Debug)]
pub enum CaptionModelError {
    #[error("api request failed: {reason}")]
    ApiRequestFailed { reason: String },

    #[error("rate limited")]
    RateLimited,

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("request timed out")]
    Timeout,
}
