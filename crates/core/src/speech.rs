use std::sync::Arc;

use tracing::{info, warn};

use crate::error::DecodeError;
use crate::ports::{AudioClip, RawTranscription, SpeechEngine, VideoSource};
use crate::types::{Transcript, TranscriptSegment};

/// Map an engine log-probability into the unit interval. Monotone for the
/// negative scores Whisper-style engines emit; anything above 0 saturates.
pub fn segment_confidence(avg_logprob: f64) -> f64 {
    let p = avg_logprob.exp();
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Wraps a speech engine and absorbs every failure at this boundary: the
/// orchestrator always receives a well-formed transcript, possibly empty.
pub struct TranscriptionAdapter {
    engine: Arc<dyn SpeechEngine>,
}

impl TranscriptionAdapter {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self { engine }
    }

    /// Extract the audio track from `source` and transcribe it.
    pub async fn transcribe_source(&self, source: &dyn VideoSource) -> Transcript {
        self.transcribe(source.audio().await).await
    }

    pub async fn transcribe(
        &self,
        audio: Result<Option<AudioClip>, DecodeError>,
    ) -> Transcript {
        let clip = match audio {
            Ok(Some(clip)) => clip,
            Ok(None) => {
                info!("video has no audio track, returning empty transcript");
                return Transcript::empty();
            }
            Err(e) => {
                warn!(error = %e, "audio extraction failed");
                return Transcript::empty_with_error(e.to_string());
            }
        };

        match self.engine.transcribe(&clip).await {
            Ok(raw) => assemble(raw),
            Err(e) => {
                warn!(error = %e, "transcription failed");
                Transcript::empty_with_error(e.to_string())
            }
        }
    }
}

fn assemble(raw: RawTranscription) -> Transcript {
    let segments: Vec<TranscriptSegment> = raw
        .segments
        .iter()
        .map(|s| TranscriptSegment {
            start: s.start,
            end: s.end,
            text: s.text.trim().to_string(),
            confidence: segment_confidence(s.avg_logprob),
        })
        .collect();

    let text = segments
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let confidence = if segments.is_empty() {
        0.0
    } else {
        segments.iter().map(|s| s.confidence).sum::<f64>() / segments.len() as f64
    };

    Transcript {
        text,
        segments,
        confidence,
        language: raw.language.unwrap_or_else(|| "unknown".to_string()),
        error: None,
    }
}
