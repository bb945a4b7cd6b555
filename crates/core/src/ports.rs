//! Trait seams for the model backends the pipeline consumes. Implementations
//! live outside the core; the pipeline shares them read-only via `Arc`.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{CaptionModelError, DecodeError, SpeechError, VisionError};
use crate::types::VideoInfo;

/// Decoded mono audio samples.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// One extracted frame, PNG-encoded.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: f64,
    pub png: Vec<u8>,
}

/// A recognized speech segment as the engine reports it. The score is an
/// unbounded log-probability; mapping it into the unit interval is the
/// transcription adapter's job.
#[derive(Debug, Clone)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub avg_logprob: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RawTranscription {
    pub segments: Vec<RawSegment>,
    pub language: Option<String>,
}

/// Independent probability distributions over the two prompt lists.
#[derive(Debug, Clone)]
pub struct SimilarityScores {
    pub scene_probs: Vec<f64>,
    pub object_probs: Vec<f64>,
}

#[async_trait]
pub trait VideoDecoder: Send + Sync {
    async fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>, DecodeError>;
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    fn info(&self) -> VideoInfo;

    /// `Ok(None)` when the video carries no audio track.
    async fn audio(&self) -> Result<Option<AudioClip>, DecodeError>;

    async fn frame(&self, timestamp: f64) -> Result<Frame, DecodeError>;
}

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn transcribe(&self, audio: &AudioClip) -> Result<RawTranscription, SpeechError>;
}

#[async_trait]
pub trait FrameScorer: Send + Sync {
    async fn score(
        &self,
        frame: &Frame,
        scene_prompts: &[String],
        object_prompts: &[String],
    ) -> Result<SimilarityScores, VisionError>;
}

#[async_trait]
pub trait CaptionModel: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, CaptionModelError>;
}
