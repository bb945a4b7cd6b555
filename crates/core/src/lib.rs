//! Vidcap Core Library
//!
//! Core functionality for the multimodal caption pipeline: decoding a short
//! video into speech and visual signal, reducing raw model outputs into
//! aggregate summaries, and fusing both into styled captions with
//! deterministic fallbacks when no generation service is available.

pub mod caption;
pub mod config;
pub mod error;
pub mod format;
pub mod ports;
pub mod processor;
pub mod sampler;
pub mod speech;
pub mod types;
pub mod vision;

// Re-export commonly used items at crate root
pub use caption::CaptionGenerator;
pub use config::ProcessorConfig;
pub use error::{CaptionModelError, DecodeError, ProcessError, SpeechError, VisionError};
pub use format::{format_result_readable, format_timestamp, format_transcript_with_timestamps};
pub use ports::{
    AudioClip, CaptionModel, Frame, FrameScorer, RawSegment, RawTranscription, SimilarityScores,
    SpeechEngine, VideoDecoder, VideoSource,
};
pub use processor::VideoProcessor;
pub use sampler::sample_times;
pub use speech::TranscriptionAdapter;
pub use types::{
    CaptionSet, CaptionStyle, FrameAnalysis, ProcessingResult, Transcript, TranscriptSegment,
    VideoInfo, VisualSummary,
};
pub use vision::{COMMON_OBJECTS, FrameClassifier, SCENE_TYPES, VisualAggregator};
