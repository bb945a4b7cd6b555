use std::sync::Arc;

use tracing::{info, warn};

use crate::ports::CaptionModel;
use crate::types::{CaptionSet, CaptionStyle, Transcript, VisualSummary};

pub const SYSTEM_PROMPT: &str = "You are an expert video caption writer.";

impl CaptionStyle {
    fn instruction(&self) -> &'static str {
        match self {
            CaptionStyle::Professional => {
                "Create a professional, formal caption suitable for business \
                 presentations. Focus on clarity and professionalism."
            }
            CaptionStyle::Creative => {
                "Create an engaging, creative caption that tells a story. Use \
                 descriptive language and make it interesting."
            }
            CaptionStyle::Accessible => {
                "Create a simple, easy-to-understand caption using clear \
                 language suitable for all audiences."
            }
        }
    }

    /// Deterministic caption assembled purely from transcript text and the
    /// readable scene label. Used when the model fails or is not configured.
    pub fn fallback(&self, text: &str, scene: &str) -> String {
        match self {
            CaptionStyle::Professional => {
                format!("This video presents content in a {scene} setting. {text}")
            }
            CaptionStyle::Creative => format!("Step into this {scene} where {text}"),
            CaptionStyle::Accessible => format!("Video shows {scene}. Speaker says: {text}"),
        }
    }
}

/// Fuses transcript and visual summary into three styled captions. Each
/// style call is isolated; a failed style falls back to its template while
/// the other styles keep their generated text.
pub struct CaptionGenerator {
    model: Option<Arc<dyn CaptionModel>>,
}

impl CaptionGenerator {
    pub fn new(model: Option<Arc<dyn CaptionModel>>) -> Self {
        Self { model }
    }

    pub async fn generate(&self, transcript: &Transcript, visual: &VisualSummary) -> CaptionSet {
        let scene = visual.scene_readable();

        let Some(model) = &self.model else {
            info!("no caption model configured, using fallback captions");
            return CaptionSet {
                professional: CaptionStyle::Professional.fallback(&transcript.text, &scene),
                creative: CaptionStyle::Creative.fallback(&transcript.text, &scene),
                accessible: CaptionStyle::Accessible.fallback(&transcript.text, &scene),
            };
        };

        let context = build_context(transcript, visual);
        CaptionSet {
            professional: one_style(
                model.as_ref(),
                CaptionStyle::Professional,
                &context,
                &transcript.text,
                &scene,
            )
            .await,
            creative: one_style(
                model.as_ref(),
                CaptionStyle::Creative,
                &context,
                &transcript.text,
                &scene,
            )
            .await,
            accessible: one_style(
                model.as_ref(),
                CaptionStyle::Accessible,
                &context,
                &transcript.text,
                &scene,
            )
            .await,
        }
    }
}

/// Shared context block sent alongside every style instruction.
fn build_context(transcript: &Transcript, visual: &VisualSummary) -> String {
    let objects = visual
        .objects
        .iter()
        .take(5)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Original transcript: {}\nVisual context: {}\nObjects visible: {}",
        transcript.text, visual.description, objects
    )
}

async fn one_style(
    model: &dyn CaptionModel,
    style: CaptionStyle,
    context: &str,
    text: &str,
    scene: &str,
) -> String {
    let prompt = format!(
        "{}\n\nContext: {}\n\nGenerate a {} caption (maximum 200 words):",
        style.instruction(),
        context,
        style.as_str()
    );

    match model.generate(SYSTEM_PROMPT, &prompt).await {
        Ok(caption) if !caption.trim().is_empty() => caption.trim().to_string(),
        Ok(_) => {
            warn!(style = style.as_str(), "caption model returned empty text");
            style.fallback(text, scene)
        }
        Err(e) => {
            warn!(style = style.as_str(), error = %e, "caption generation failed");
            style.fallback(text, scene)
        }
    }
}
