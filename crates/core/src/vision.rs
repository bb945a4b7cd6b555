use std::sync::Arc;

use tracing::{info, warn};

use crate::error::VisionError;
use crate::ports::{Frame, FrameScorer, VideoSource};
use crate::sampler::sample_times;
use crate::types::{FrameAnalysis, VisualSummary};

/// Closed vocabulary of candidate scene settings.
pub const SCENE_TYPES: [&str; 10] = [
    "indoor office",
    "outdoor scene",
    "presentation room",
    "meeting room",
    "home interior",
    "street scene",
    "nature scene",
    "classroom",
    "conference room",
    "living room",
];

/// Closed vocabulary of candidate objects for multi-label detection.
pub const COMMON_OBJECTS: [&str; 17] = [
    "person",
    "people",
    "computer",
    "laptop",
    "phone",
    "table",
    "chair",
    "screen",
    "monitor",
    "whiteboard",
    "car",
    "building",
    "tree",
    "book",
    "document",
    "microphone",
    "camera",
];

/// Minimum probability for an object label to count as detected.
pub const OBJECT_THRESHOLD: f64 = 0.1;

/// Caps the aggregated object union.
const MAX_OBJECTS: usize = 10;

/// Classifies one frame against the two fixed vocabularies. Scene selection
/// is top-1; object detection is multi-label over the threshold. Any scorer
/// failure degrades to a neutral analysis instead of failing the batch.
pub struct FrameClassifier {
    scorer: Arc<dyn FrameScorer>,
    scene_prompts: Vec<String>,
    object_prompts: Vec<String>,
}

impl FrameClassifier {
    pub fn new(scorer: Arc<dyn FrameScorer>) -> Self {
        Self {
            scorer,
            scene_prompts: SCENE_TYPES
                .iter()
                .map(|s| format!("a photo of {s}"))
                .collect(),
            object_prompts: COMMON_OBJECTS
                .iter()
                .map(|o| format!("a photo of a {o}"))
                .collect(),
        }
    }

    pub async fn classify(&self, frame: &Frame) -> FrameAnalysis {
        match self.try_classify(frame).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(timestamp = frame.timestamp, error = %e, "frame classification failed");
                FrameAnalysis::neutral()
            }
        }
    }

    async fn try_classify(&self, frame: &Frame) -> Result<FrameAnalysis, VisionError> {
        let scores = self
            .scorer
            .score(frame, &self.scene_prompts, &self.object_prompts)
            .await?;

        if scores.scene_probs.len() != SCENE_TYPES.len() {
            return Err(VisionError::ScoreShapeMismatch {
                expected: SCENE_TYPES.len(),
                got: scores.scene_probs.len(),
            });
        }
        if scores.object_probs.len() != COMMON_OBJECTS.len() {
            return Err(VisionError::ScoreShapeMismatch {
                expected: COMMON_OBJECTS.len(),
                got: scores.object_probs.len(),
            });
        }

        // Top-1 scene, earliest index wins ties.
        let mut scene_idx = 0;
        let mut scene_prob = scores.scene_probs[0];
        for (i, &p) in scores.scene_probs.iter().enumerate().skip(1) {
            if p > scene_prob {
                scene_idx = i;
                scene_prob = p;
            }
        }
        let scene_type = SCENE_TYPES[scene_idx].replace(' ', "_");

        let objects: Vec<String> = COMMON_OBJECTS
            .iter()
            .zip(scores.object_probs.iter())
            .filter(|&(_, &p)| p > OBJECT_THRESHOLD)
            .map(|(o, _)| o.to_string())
            .collect();

        let shown = objects
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let description = format!(
            "Scene shows {} with {}",
            SCENE_TYPES[scene_idx], shown
        );

        Ok(FrameAnalysis {
            scene_type,
            scene_confidence: scene_prob.clamp(0.0, 1.0),
            objects,
            description,
        })
    }
}

/// Runs the sampler and classifier across the clip and reduces the per-frame
/// results into one summary.
pub struct VisualAggregator {
    classifier: FrameClassifier,
    num_frames: usize,
}

impl VisualAggregator {
    pub fn new(scorer: Arc<dyn FrameScorer>, num_frames: usize) -> Self {
        Self {
            classifier: FrameClassifier::new(scorer),
            num_frames,
        }
    }

    pub async fn analyze(&self, source: &dyn VideoSource) -> VisualSummary {
        let duration = source.info().duration;
        let times = sample_times(duration, self.num_frames);

        let mut analyses = Vec::with_capacity(times.len());
        for t in times {
            let frame = match source.frame(t).await {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(timestamp = t, error = %e, "skipping frame");
                    continue;
                }
            };
            analyses.push(self.classifier.classify(&frame).await);
        }

        info!(frame_count = analyses.len(), "visual analysis complete");
        aggregate(analyses)
    }
}

/// Reduce per-frame analyses: majority-vote scene (first-seen label wins
/// ties), ordered deduplicated object union capped at 10, templated
/// description. Zero frames is a degraded-but-valid result.
pub fn aggregate(analyses: Vec<FrameAnalysis>) -> VisualSummary {
    if analyses.is_empty() {
        return VisualSummary::degraded();
    }

    let scene_type = majority_scene(&analyses);

    let mut objects: Vec<String> = Vec::new();
    for analysis in &analyses {
        for object in &analysis.objects {
            if !objects.contains(object) {
                objects.push(object.clone());
            }
        }
    }
    objects.truncate(MAX_OBJECTS);

    let description = describe_scene(&scene_type, &objects);

    VisualSummary {
        scene_type,
        objects,
        description,
        frame_count: analyses.len(),
        individual_frames: analyses,
    }
}

fn majority_scene(analyses: &[FrameAnalysis]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for analysis in analyses {
        match counts.iter_mut().find(|(l, _)| *l == analysis.scene_type) {
            Some(entry) => entry.1 += 1,
            None => counts.push((analysis.scene_type.as_str(), 1)),
        }
    }
    // Strictly-greater comparison keeps the first-encountered label on ties.
    let mut best = counts[0];
    for &candidate in &counts[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    best.0.to_string()
}

fn describe_scene(scene_type: &str, objects: &[String]) -> String {
    let scene = scene_type.replace('_', " ");
    let objects_str = if objects.is_empty() {
        "various items".to_string()
    } else {
        objects
            .iter()
            .take(5)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "The video takes place in a {scene} setting featuring {objects_str}. \
         The scene contains multiple elements that suggest {scene} environment."
    )
}
