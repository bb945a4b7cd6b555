use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use vidcap_core::{Frame, FrameScorer, SimilarityScores, VisionError};

/// Client for a CLIP-style scoring service: one PNG frame plus the two
/// candidate-phrase lists in, one probability distribution per list out.
pub struct ClipHttpScorer {
    client: reqwest::Client,
    url: String,
}

impl ClipHttpScorer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    image: String,
    scene_prompts: &'a [String],
    object_prompts: &'a [String],
}

#[derive(Deserialize)]
struct ScoreResponse {
    scene_probs: Vec<f64>,
    object_probs: Vec<f64>,
}

#[async_trait]
impl FrameScorer for ClipHttpScorer {
    async fn score(
        &self,
        frame: &Frame,
        scene_prompts: &[String],
        object_prompts: &[String],
    ) -> Result<SimilarityScores, VisionError> {
        let request = ScoreRequest {
            image: general_purpose::STANDARD.encode(&frame.png),
            scene_prompts,
            object_prompts,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VisionError::ScoringFailed {
                reason: e.to_string(),
            })?;

        let scores: ScoreResponse =
            response
                .json()
                .await
                .map_err(|e| VisionError::ScoringFailed {
                    reason: e.to_string(),
                })?;

        Ok(SimilarityScores {
            scene_probs: scores.scene_probs,
            object_probs: scores.object_probs,
        })
    }
}
