use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use vidcap_core::{AudioClip, DecodeError, Frame, VideoDecoder, VideoInfo, VideoSource};

/// Decodes videos with the ffprobe/ffmpeg binaries: ffprobe for stream
/// metadata, ffmpeg for audio extraction and single-frame grabs.
pub struct FfmpegDecoder;

#[async_trait]
impl VideoDecoder for FfmpegDecoder {
    async fn open(&self, path: &Path) -> Result<Box<dyn VideoSource>, DecodeError> {
        let probe = probe(path).await?;

        let video = probe
            .streams
            .iter()
            .find(|s| s.codec_type == "video")
            .ok_or_else(|| DecodeError::ProbeFailed {
                reason: "no video stream".to_string(),
            })?;
        let has_audio = probe.streams.iter().any(|s| s.codec_type == "audio");

        let duration = probe
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| DecodeError::ProbeFailed {
                reason: "missing duration".to_string(),
            })?;

        let info = VideoInfo {
            duration,
            frame_rate: video
                .avg_frame_rate
                .as_deref()
                .map(parse_frame_rate)
                .unwrap_or(0.0),
            width: video.width.unwrap_or(0),
            height: video.height.unwrap_or(0),
        };
        debug!(?info, has_audio, "probed video");

        Ok(Box::new(FfmpegSource {
            path: path.to_path_buf(),
            info,
            has_audio,
        }))
    }
}

struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    has_audio: bool,
}

#[async_trait]
impl VideoSource for FfmpegSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    async fn audio(&self) -> Result<Option<AudioClip>, DecodeError> {
        if !self.has_audio {
            return Ok(None);
        }

        let wav = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(DecodeError::Io)?;
        let output = Command::new("ffmpeg")
            .arg("-y")
            .arg("-i")
            .arg(&self.path)
            .arg("-vn")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ar")
            .arg("16000")
            .arg("-ac")
            .arg("1")
            .arg(wav.path())
            .output()
            .await?;

        if !output.status.success() {
            return Err(DecodeError::AudioExtractionFailed {
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let reader =
            hound::WavReader::open(wav.path()).map_err(|e| DecodeError::AudioExtractionFailed {
                reason: e.to_string(),
            })?;
        let sample_rate = reader.spec().sample_rate;
        let samples = reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| DecodeError::AudioExtractionFailed {
                reason: e.to_string(),
            })?;

        Ok(Some(AudioClip {
            samples,
            sample_rate,
        }))
    }

    async fn frame(&self, timestamp: f64) -> Result<Frame, DecodeError> {
        let output = Command::new("ffmpeg")
            .arg("-ss")
            .arg(format!("{timestamp:.3}"))
            .arg("-i")
            .arg(&self.path)
            .arg("-frames:v")
            .arg("1")
            .arg("-f")
            .arg("image2pipe")
            .arg("-vcodec")
            .arg("png")
            .arg("-")
            .output()
            .await?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(DecodeError::FrameExtractionFailed {
                timestamp,
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(Frame {
            timestamp,
            png: output.stdout,
        })
    }
}

async fn probe(path: &Path) -> Result<ProbeOutput, DecodeError> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-print_format")
        .arg("json")
        .arg("-show_format")
        .arg("-show_streams")
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(DecodeError::ProbeFailed {
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    serde_json::from_slice(&output.stdout).map_err(|e| DecodeError::ProbeFailed {
        reason: e.to_string(),
    })
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: ProbeFormat,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// ffprobe reports frame rates as rationals like "30000/1001".
fn parse_frame_rate(raw: &str) -> f64 {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().unwrap_or(0.0);
            let den: f64 = den.parse().unwrap_or(1.0);
            if den == 0.0 { 0.0 } else { num / den }
        }
        None => raw.parse().unwrap_or(0.0),
    }
}
