use serde::{Deserialize, Serialize};

/// Basic properties of a decoded video, derived once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VideoInfo {
    pub duration: f64,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// Unit-interval confidence mapped from the engine's log-probability.
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    /// Mean of segment confidences, 0 when there are no segments.
    pub confidence: f64,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Transcript {
    /// The shape returned for silent videos. Not an error.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            segments: Vec::new(),
            confidence: 0.0,
            language: "unknown".to_string(),
            error: None,
        }
    }

    /// Empty transcript annotated with the stage failure that produced it.
    pub fn empty_with_error(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::empty()
        }
    }
}

/// Classification result for a single sampled frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Scene label, underscores for multi-word phrases.
    pub scene_type: String,
    pub scene_confidence: f64,
    /// Every object label whose probability cleared the detection threshold.
    pub objects: Vec<String>,
    pub description: String,
}

impl FrameAnalysis {
    /// Safe default used when a single frame cannot be analyzed.
    pub fn neutral() -> Self {
        Self {
            scene_type: "unknown".to_string(),
            scene_confidence: 0.0,
            objects: Vec::new(),
            description: "Could not analyze frame".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualSummary {
    /// Majority-vote scene label across analyzed frames.
    pub scene_type: String,
    /// Deduplicated union of detected objects, at most 10 entries.
    pub objects: Vec<String>,
    pub description: String,
    pub frame_count: usize,
    pub individual_frames: Vec<FrameAnalysis>,
}

impl VisualSummary {
    /// The shape returned when no frame could be analyzed. Not an error.
    pub fn degraded() -> Self {
        Self {
            scene_type: "unknown".to_string(),
            objects: Vec::new(),
            description: "Could not analyze video frames".to_string(),
            frame_count: 0,
            individual_frames: Vec::new(),
        }
    }

    /// Scene label rendered with spaces for display.
    pub fn scene_readable(&self) -> String {
        self.scene_type.replace('_', " ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    Professional,
    Creative,
    Accessible,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 3] = [
        CaptionStyle::Professional,
        CaptionStyle::Creative,
        CaptionStyle::Accessible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionStyle::Professional => "professional",
            CaptionStyle::Creative => "creative",
            CaptionStyle::Accessible => "accessible",
        }
    }
}

/// One caption per style. Every field is always populated; failed styles
/// carry their deterministic fallback text instead of an empty value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionSet {
    pub professional: String,
    pub creative: String,
    pub accessible: String,
}

impl CaptionSet {
    pub fn get(&self, style: CaptionStyle) -> &str {
        match style {
            CaptionStyle::Professional => &self.professional,
            CaptionStyle::Creative => &self.creative,
            CaptionStyle::Accessible => &self.accessible,
        }
    }
}

/// Final result assembled once per request. Not persisted anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub video_info: VideoInfo,
    pub transcript: Transcript,
    pub visual_summary: VisualSummary,
    pub captions: CaptionSet,
    pub processing_time: f64,
    pub timestamp: String,
}
