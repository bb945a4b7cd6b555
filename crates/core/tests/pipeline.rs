//! End-to-end pipeline tests against in-memory mock backends.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use vidcap_core::{
    AudioClip, COMMON_OBJECTS, CaptionModel, CaptionModelError, CaptionStyle, DecodeError, Frame,
    FrameScorer, ProcessError, ProcessorConfig, RawSegment, RawTranscription, SCENE_TYPES,
    SimilarityScores, SpeechEngine, SpeechError, VideoDecoder, VideoInfo, VideoProcessor,
    VideoSource, VisionError,
};

struct MockDecoder {
    duration: f64,
    has_audio: bool,
    frames_fail: bool,
    open_delay: Option<Duration>,
    fail_open: bool,
    opens: AtomicUsize,
}

impl MockDecoder {
    fn new(duration: f64, has_audio: bool) -> Arc<Self> {
        Arc::new(Self {
            duration,
            has_audio,
            frames_fail: false,
            open_delay: None,
            fail_open: false,
            opens: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl VideoDecoder for MockDecoder {
    async fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>, DecodeError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "upload must be persisted before decoding");
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_open {
            return Err(DecodeError::ProbeFailed {
                reason: "corrupt container".to_string(),
            });
        }
        Ok(Box::new(MockSource {
            duration: self.duration,
            has_audio: self.has_audio,
            frames_fail: self.frames_fail,
        }))
    }
}

struct MockSource {
    duration: f64,
    has_audio: bool,
    frames_fail: bool,
}

#[async_trait]
impl VideoSource for MockSource {
    fn info(&self) -> VideoInfo {
        VideoInfo {
            duration: self.duration,
            frame_rate: 30.0,
            width: 640,
            height: 360,
        }
    }

    async fn audio(&self) -> Result<Option<AudioClip>, DecodeError> {
        Ok(self.has_audio.then(|| AudioClip {
            samples: vec![0.0; 16000],
            sample_rate: 16000,
        }))
    }

    async fn frame(&self, timestamp: f64) -> Result<Frame, DecodeError> {
        if self.frames_fail {
            return Err(DecodeError::FrameExtractionFailed {
                timestamp,
                reason: "no video stream".to_string(),
            });
        }
        Ok(Frame {
            timestamp,
            png: vec![0x89, 0x50, 0x4e, 0x47],
        })
    }
}

/// Scores every frame as the given scene with one detected object.
struct SceneScorer(&'static str);

#[async_trait]
impl FrameScorer for SceneScorer {
    async fn score(
        &self,
        _frame: &Frame,
        _scene_prompts: &[String],
        _object_prompts: &[String],
    ) -> Result<SimilarityScores, VisionError> {
        let idx = SCENE_TYPES.iter().position(|s| *s == self.0).unwrap();
        let mut scene_probs = vec![0.01; SCENE_TYPES.len()];
        scene_probs[idx] = 0.9;
        let mut object_probs = vec![0.0; COMMON_OBJECTS.len()];
        object_probs[0] = 0.5; // person
        Ok(SimilarityScores {
            scene_probs,
            object_probs,
        })
    }
}

struct SilentEngine;

#[async_trait]
impl SpeechEngine for SilentEngine {
    async fn transcribe(&self, _audio: &AudioClip) -> Result<RawTranscription, SpeechError> {
        Ok(RawTranscription::default())
    }
}

struct SpeakingEngine(&'static str);

#[async_trait]
impl SpeechEngine for SpeakingEngine {
    async fn transcribe(&self, _audio: &AudioClip) -> Result<RawTranscription, SpeechError> {
        Ok(RawTranscription {
            segments: vec![RawSegment {
                start: 0.0,
                end: 2.0,
                text: self.0.to_string(),
                avg_logprob: -0.25,
            }],
            language: Some("en".to_string()),
        })
    }
}

struct EchoModel;

#[async_trait]
impl CaptionModel for EchoModel {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, CaptionModelError> {
        for style in CaptionStyle::ALL {
            if prompt.contains(&format!("Generate a {} caption", style.as_str())) {
                return Ok(format!("generated {} caption", style.as_str()));
            }
        }
        Ok("generated caption".to_string())
    }
}

struct Harness {
    processor: VideoProcessor,
    decoder: Arc<MockDecoder>,
    scratch_root: tempfile::TempDir,
}

impl Harness {
    fn assert_scratch_empty(&self) {
        let leftovers: Vec<_> = std::fs::read_dir(self.scratch_root.path())
            .unwrap()
            .collect();
        assert!(leftovers.is_empty(), "scratch residue: {leftovers:?}");
    }
}

fn harness(
    decoder: Arc<MockDecoder>,
    speech: Arc<dyn SpeechEngine>,
    model: Option<Arc<dyn CaptionModel>>,
    configure: impl FnOnce(&mut ProcessorConfig),
) -> Harness {
    let scratch_root = tempfile::tempdir().unwrap();
    let mut config = ProcessorConfig {
        scratch_dir: Some(scratch_root.path().to_path_buf()),
        ..ProcessorConfig::default()
    };
    configure(&mut config);
    let processor = VideoProcessor::new(
        config,
        decoder.clone(),
        speech,
        Arc::new(SceneScorer("classroom")),
        model,
    );
    Harness {
        processor,
        decoder,
        scratch_root,
    }
}

#[tokio::test]
async fn silent_classroom_video_without_model_uses_fallback_captions() {
    let h = harness(
        MockDecoder::new(10.0, false),
        Arc::new(SilentEngine),
        None,
        |_| {},
    );

    let result = h.processor.process(b"fake video", "lecture.mp4").await.unwrap();

    assert_eq!(result.transcript.text, "");
    assert_eq!(result.transcript.confidence, 0.0);
    assert!(result.transcript.segments.is_empty());
    assert_eq!(result.visual_summary.scene_type, "classroom");
    assert_eq!(result.visual_summary.frame_count, 5);
    assert_eq!(result.visual_summary.objects, vec!["person"]);
    assert_eq!(
        result.captions.accessible,
        "Video shows classroom. Speaker says: "
    );
    for style in CaptionStyle::ALL {
        assert!(!result.captions.get(style).is_empty());
    }
    h.assert_scratch_empty();
}

#[tokio::test]
async fn speech_and_model_produce_generated_captions() {
    let h = harness(
        MockDecoder::new(30.0, true),
        Arc::new(SpeakingEngine("welcome to the lecture")),
        Some(Arc::new(EchoModel)),
        |_| {},
    );

    let result = h.processor.process(b"fake video", "talk.mov").await.unwrap();

    assert_eq!(result.transcript.text, "welcome to the lecture");
    assert!(result.transcript.confidence > 0.0 && result.transcript.confidence <= 1.0);
    assert_eq!(result.captions.professional, "generated professional caption");
    assert_eq!(result.captions.creative, "generated creative caption");
    assert_eq!(result.captions.accessible, "generated accessible caption");
    h.assert_scratch_empty();
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_any_decode() {
    let h = harness(
        MockDecoder::new(10.0, false),
        Arc::new(SilentEngine),
        None,
        |c| c.max_file_size = 8,
    );

    let err = h
        .processor
        .process(&[0u8; 64], "big.mp4")
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessError::FileTooLarge { size: 64, .. }));
    assert!(err.is_client_error());
    assert_eq!(h.decoder.opens.load(Ordering::SeqCst), 0);
    h.assert_scratch_empty();
}

#[tokio::test]
async fn unsupported_extension_is_rejected_before_any_decode() {
    let h = harness(
        MockDecoder::new(10.0, false),
        Arc::new(SilentEngine),
        None,
        |_| {},
    );

    let err = h
        .processor
        .process(b"fake", "notes.webm")
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessError::UnsupportedFormat { .. }));
    assert!(err.is_client_error());
    assert_eq!(h.decoder.opens.load(Ordering::SeqCst), 0);
    h.assert_scratch_empty();
}

#[tokio::test]
async fn overlong_video_is_rejected_after_decode_with_cleanup() {
    let h = harness(
        MockDecoder::new(300.0, false),
        Arc::new(SilentEngine),
        None,
        |_| {},
    );

    let err = h.processor.process(b"fake", "long.mp4").await.unwrap_err();

    assert!(matches!(
        err,
        ProcessError::VideoTooLong { duration, .. } if duration == 300.0
    ));
    assert_eq!(h.decoder.opens.load(Ordering::SeqCst), 1);
    h.assert_scratch_empty();
}

#[tokio::test]
async fn decode_failure_propagates_and_cleans_up() {
    let decoder = Arc::new(MockDecoder {
        duration: 10.0,
        has_audio: false,
        frames_fail: false,
        open_delay: None,
        fail_open: true,
        opens: AtomicUsize::new(0),
    });
    let h = harness(decoder, Arc::new(SilentEngine), None, |_| {});

    let err = h.processor.process(b"fake", "bad.mp4").await.unwrap_err();

    assert!(matches!(err, ProcessError::Decode(_)));
    assert!(!err.is_client_error());
    h.assert_scratch_empty();
}

#[tokio::test]
async fn failed_frame_extraction_degrades_to_unknown_scene() {
    let decoder = Arc::new(MockDecoder {
        duration: 10.0,
        has_audio: false,
        frames_fail: true,
        open_delay: None,
        fail_open: false,
        opens: AtomicUsize::new(0),
    });
    let h = harness(decoder, Arc::new(SilentEngine), None, |_| {});

    let result = h.processor.process(b"fake", "clip.avi").await.unwrap();

    assert_eq!(result.visual_summary.scene_type, "unknown");
    assert_eq!(result.visual_summary.frame_count, 0);
    assert!(result.visual_summary.objects.is_empty());
    assert_eq!(
        result.captions.accessible,
        "Video shows unknown. Speaker says: "
    );
    h.assert_scratch_empty();
}

#[tokio::test]
async fn deadline_cancels_the_run_and_releases_scratch() {
    let decoder = Arc::new(MockDecoder {
        duration: 10.0,
        has_audio: false,
        frames_fail: false,
        open_delay: Some(Duration::from_secs(30)),
        fail_open: false,
        opens: AtomicUsize::new(0),
    });
    let h = harness(decoder, Arc::new(SilentEngine), None, |c| {
        c.timeout = Some(Duration::from_millis(50));
    });

    let err = h.processor.process(b"fake", "slow.mp4").await.unwrap_err();

    assert!(matches!(err, ProcessError::Timeout { .. }));
    h.assert_scratch_empty();
}
