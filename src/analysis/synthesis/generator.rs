use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;

/// Reference answer used when no generation endpoint is configured.
const REFERENCE_RESPONSE: &str = r#"{
  "summary": "Document analysis summary based on content",
  "keyPoints": ["Key point 1", "Key point 2", "Key point 3"],
  "risks": [
    {
      "level": "HIGH",
      "description": "Critical risk identified",
      "impact": "Could lead to legal issues"
    },
    {
      "level": "MEDIUM",
      "description": "Moderate risk",
      "impact": "Requires attention"
    }
  ],
  "recommendations": ["Recommendation 1", "Recommendation 2"],
  "confidence": 0.85
}"#;

/// External text-generation capability. Output shape is never trusted.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation endpoint unreachable: {0}")]
    Transport(String),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("generation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generation response could not be decoded: {0}")]
    Response(String),
}

/// Returns the same text for every prompt.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    response: String,
}

impl ScriptedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    pub fn reference() -> Self {
        Self::new(REFERENCE_RESPONSE)
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for an Ollama-compatible `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpGenerator {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TextGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Timeout(self.timeout)
                } else {
                    GenerationError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Response(err.to_string()))?;

        Ok(parsed.response)
    }
}

/// Generator selected from [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredGenerator {
    Scripted(ScriptedGenerator),
    Http(HttpGenerator),
}

impl ConfiguredGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        match &config.endpoint {
            Some(endpoint) => Ok(Self::Http(HttpGenerator::new(
                endpoint,
                config.model.clone(),
                config.timeout,
            )?)),
            None => Ok(Self::Scripted(ScriptedGenerator::reference())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ConfiguredGenerator::Scripted(_) => "scripted reference generator".to_string(),
            ConfiguredGenerator::Http(client) => format!("http generator at {}", client.base_url()),
        }
    }
}

impl TextGenerator for ConfiguredGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self {
            ConfiguredGenerator::Scripted(generator) => generator.generate(prompt).await,
            ConfiguredGenerator::Http(generator) => generator.generate(prompt).await,
        }
    }
}
