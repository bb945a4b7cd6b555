mod engines;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;

use engines::{ClipHttpScorer, FfmpegDecoder, OpenAiCaptionModel, Provider, WhisperCliEngine};
use vidcap_core::{CaptionModel, ProcessorConfig, VideoProcessor, format_result_readable};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidcap")]
#[command(
    about = "Transcribe a short video, analyze its frames, and generate styled captions"
)]
struct Cli {
    /// Video file (mp4, mov, or avi)
    video: PathBuf,

    /// AI provider for caption generation
    #[arg(short, long, default_value = "grok")]
    provider: CliProvider,

    /// Number of frames sampled for visual analysis
    #[arg(long, default_value_t = 5)]
    frames: usize,

    /// Maximum accepted video duration in seconds
    #[arg(long, default_value_t = 120.0)]
    max_duration: f64,

    /// Maximum accepted file size in megabytes
    #[arg(long, default_value_t = 100)]
    max_size_mb: u64,

    /// Whole-pipeline deadline in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// CLIP scoring service endpoint
    #[arg(long, default_value = "http://127.0.0.1:8800/score")]
    clip_url: String,

    /// Whisper model name
    #[arg(long, default_value = "base")]
    whisper_model: String,

    /// Print the raw JSON result instead of the readable report
    #[arg(long)]
    json: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    // Missing credentials degrade to fallback captions rather than aborting.
    let caption_model: Option<Arc<dyn CaptionModel>> = match provider.api_key() {
        Ok(key) => Some(Arc::new(OpenAiCaptionModel::new(provider.clone(), key))),
        Err(e) => {
            println!(
                "{} {} — captions will use fallback templates",
                style("Warning:").yellow().bold(),
                e
            );
            None
        }
    };

    let filename = cli
        .video
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("video path has no file name")?;
    let data = fs::read(&cli.video)
        .await
        .with_context(|| format!("failed to read {}", cli.video.display()))?;

    println!(
        "\n{}  {}\n",
        style("vidcap").cyan().bold(),
        style("Video Caption Generator").dim()
    );

    let config = ProcessorConfig {
        max_file_size: cli.max_size_mb * 1024 * 1024,
        max_duration: cli.max_duration,
        num_frames: cli.frames,
        timeout: cli.timeout.map(Duration::from_secs),
        scratch_dir: None,
    };
    let processor = VideoProcessor::new(
        config,
        Arc::new(FfmpegDecoder),
        Arc::new(WhisperCliEngine::new(cli.whisper_model)),
        Arc::new(ClipHttpScorer::new(cli.clip_url)),
        caption_model,
    );

    let spinner = create_spinner("Processing video...");
    let result = match processor.process(&data, &filename).await {
        Ok(result) => {
            spinner.finish_with_message(format!(
                "{} Processed in {:.2}s",
                style("✓").green().bold(),
                result.processing_time
            ));
            result
        }
        Err(e) => {
            spinner.finish_with_message(format!("{} Failed", style("✗").red().bold()));
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(if e.is_client_error() { 2 } else { 1 });
        }
    };

    println!("{}", style("─".repeat(60)).dim());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_result_readable(&result));
    }

    Ok(())
}
