use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use vidcap_core::{AudioClip, RawSegment, RawTranscription, SpeechEngine, SpeechError};

/// Speech engine backed by the Whisper CLI. The clip is written to a scratch
/// WAV file and transcribed with JSON output, which carries the per-segment
/// avg_logprob the transcription adapter maps into a confidence.
pub struct WhisperCliEngine {
    model: String,
}

impl WhisperCliEngine {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl SpeechEngine for WhisperCliEngine {
    async fn transcribe(&self, audio: &AudioClip) -> Result<RawTranscription, SpeechError> {
        let dir = tempfile::tempdir()?;
        let wav_path = dir.path().join("audio.wav");
        write_wav(&wav_path, audio).map_err(|e| SpeechError::EngineFailed {
            reason: format!("failed to write wav: {e}"),
        })?;

        let output = Command::new("whisper")
            .arg(&wav_path)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(dir.path())
            .output()
            .await?;

        if !output.status.success() {
            return Err(SpeechError::EngineFailed {
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        // Whisper names its output after the input file.
        let json_path = dir.path().join("audio.json");
        let content = tokio::fs::read_to_string(&json_path).await?;
        let parsed: WhisperOutput =
            serde_json::from_str(&content).map_err(|e| SpeechError::EngineFailed {
                reason: format!("invalid whisper output: {e}"),
            })?;
        debug!(segments = parsed.segments.len(), "whisper transcription done");

        Ok(into_raw(parsed))
    }
}

fn into_raw(parsed: WhisperOutput) -> RawTranscription {
    RawTranscription {
        segments: parsed
            .segments
            .into_iter()
            .map(|s| RawSegment {
                start: s.start,
                end: s.end,
                text: s.text,
                // A segment without a score must not pass as fully
                // confident; negative infinity maps to confidence 0.
                avg_logprob: s.avg_logprob.unwrap_or(f64::NEG_INFINITY),
            })
            .collect(),
        language: parsed.language,
    }
}

fn write_wav(path: &std::path::Path, audio: &AudioClip) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in &audio.samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

#[derive(Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
    avg_logprob: Option<f64>,
}
