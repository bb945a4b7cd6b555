use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tempfile::TempDir;
use tokio::fs;
use tracing::{info, warn};

use crate::caption::CaptionGenerator;
use crate::config::{ACCEPTED_EXTENSIONS, ProcessorConfig};
use crate::error::ProcessError;
use crate::ports::{CaptionModel, FrameScorer, SpeechEngine, VideoDecoder};
use crate::speech::TranscriptionAdapter;
use crate::types::ProcessingResult;
use crate::vision::VisualAggregator;

/// Sequences the whole pipeline: validation, scratch persistence, decode,
/// transcription and visual aggregation, caption generation, assembly.
/// Sub-stage failures are absorbed by the stages themselves; only
/// validation, duration, decode and IO errors escape.
pub struct VideoProcessor {
    config: ProcessorConfig,
    decoder: Arc<dyn VideoDecoder>,
    transcription: TranscriptionAdapter,
    visual: VisualAggregator,
    captions: CaptionGenerator,
}

impl VideoProcessor {
    pub fn new(
        config: ProcessorConfig,
        decoder: Arc<dyn VideoDecoder>,
        speech: Arc<dyn SpeechEngine>,
        scorer: Arc<dyn FrameScorer>,
        caption_model: Option<Arc<dyn CaptionModel>>,
    ) -> Self {
        let visual = VisualAggregator::new(scorer, config.num_frames);
        Self {
            config,
            decoder,
            transcription: TranscriptionAdapter::new(speech),
            visual,
            captions: CaptionGenerator::new(caption_model),
        }
    }

    pub async fn process(
        &self,
        data: &[u8],
        filename: &str,
    ) -> Result<ProcessingResult, ProcessError> {
        let started = Instant::now();
        self.validate(data.len() as u64, filename)?;

        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(data, filename, started))
                .await
                .unwrap_or_else(|_| {
                    warn!(filename, "processing deadline exceeded");
                    Err(ProcessError::Timeout {
                        seconds: limit.as_secs_f64(),
                    })
                }),
            None => self.run(data, filename, started).await,
        }
    }

    /// Rejects oversized uploads and unknown extensions before any
    /// filesystem or decode work happens.
    fn validate(&self, size: u64, filename: &str) -> Result<(), ProcessError> {
        if size > self.config.max_file_size {
            return Err(ProcessError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        if extension_of(filename).is_none() {
            return Err(ProcessError::UnsupportedFormat {
                filename: filename.to_string(),
            });
        }
        Ok(())
    }

    async fn run(
        &self,
        data: &[u8],
        filename: &str,
        started: Instant,
    ) -> Result<ProcessingResult, ProcessError> {
        // Scratch dir is removed on drop, covering every exit path
        // including cancellation by the deadline.
        let scratch = self.scratch_dir()?;
        let ext = extension_of(filename).unwrap_or_else(|| "mp4".to_string());
        let video_path = scratch.path().join(format!("upload.{ext}"));
        fs::write(&video_path, data).await?;

        let source = self.decoder.open(&video_path).await?;
        let video_info = source.info();
        if video_info.duration > self.config.max_duration {
            return Err(ProcessError::VideoTooLong {
                duration: video_info.duration,
                max: self.config.max_duration,
            });
        }
        info!(
            filename,
            duration = video_info.duration,
            frame_rate = video_info.frame_rate,
            "video decoded"
        );

        // Independent read-only stages, evaluated concurrently.
        let (transcript, visual_summary) = tokio::join!(
            self.transcription.transcribe_source(source.as_ref()),
            self.visual.analyze(source.as_ref()),
        );

        let captions = self.captions.generate(&transcript, &visual_summary).await;

        let processing_time = started.elapsed().as_secs_f64();
        info!(filename, processing_time, "video processed");

        Ok(ProcessingResult {
            video_info,
            transcript,
            visual_summary,
            captions,
            processing_time,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    fn scratch_dir(&self) -> std::io::Result<TempDir> {
        match &self.config.scratch_dir {
            Some(root) => tempfile::tempdir_in(root),
            None => tempfile::tempdir(),
        }
    }
}

fn extension_of(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    ACCEPTED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert_eq!(extension_of("clip.mp4").as_deref(), Some("mp4"));
        assert_eq!(extension_of("CLIP.MOV").as_deref(), Some("mov"));
        assert_eq!(extension_of("a.b.avi").as_deref(), Some("avi"));
    }

    #[test]
    fn rejects_unknown_or_missing_extensions() {
        assert!(extension_of("notes.txt").is_none());
        assert!(extension_of("clip.webm").is_none());
        assert!(extension_of("noextension").is_none());
    }
}
