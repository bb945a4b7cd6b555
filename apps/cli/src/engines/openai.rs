use async_trait::async_trait;

use vidcap_core::{CaptionModel, CaptionModelError};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: &'static str },
}

#[derive(Clone, Debug, Default)]
pub enum Provider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-3-pro",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Look up the API key for this provider, if configured.
    pub fn api_key(&self) -> Result<String, ProviderError> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| ProviderError::MissingApiKey {
            env_var: config.env_var,
        })
    }
}

/// Caption model backed by an OpenAI-compatible chat-completions endpoint.
/// Bounded output and moderate temperature; captions are not deterministic.
pub struct OpenAiCaptionModel {
    provider: Provider,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCaptionModel {
    pub fn new(provider: Provider, api_key: String) -> Self {
        Self {
            provider,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CaptionModel for OpenAiCaptionModel {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, CaptionModelError> {
        let config = self.provider.config();

        let response = self
            .client
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system,
                    },
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "max_tokens": 200,
                "temperature": 0.7,
            }))
            .send()
            .await
            .map_err(map_reqwest)?;

        if response.status().as_u16() == 429 {
            return Err(CaptionModelError::RateLimited);
        }

        let value = response
            .json::<serde_json::Value>()
            .await
            .map_err(map_reqwest)?;

        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CaptionModelError::InvalidResponse {
                reason: format!("unexpected response shape: {value:?}"),
            })?;

        Ok(content.trim().to_string())
    }
}

fn map_reqwest(e: reqwest::Error) -> CaptionModelError {
    if e.is_timeout() {
        CaptionModelError::Timeout
    } else {
        CaptionModelError::ApiRequestFailed {
            reason: e.to_string(),
        }
    }
}
