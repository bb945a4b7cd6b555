pub mod clip_http;
pub mod ffmpeg;
pub mod openai;
pub mod whisper;

pub use clip_http::ClipHttpScorer;
pub use ffmpeg::FfmpegDecoder;
pub use openai::{OpenAiCaptionModel, Provider};
pub use whisper::WhisperCliEngine;
