use async_trait::async_trait;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, Result};
use crate::provider::{GeneratorInfo, TextGenerator};

/// Chat-completions client for OpenAI-compatible hosts (OpenRouter by default).
pub struct OpenAiCompatGenerator {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    pub fn new(cfg: &GeneratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": temperature
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, temperature, prompt_len = prompt.len(), "textgen: request");

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status: status.as_u16(), body });
        }

        let json: serde_json::Value = resp.json().await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| GenerationError::InvalidResponse("missing choices[0].message.content".into()))?;

        Ok(content.trim().to_string())
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            name: "openai-compat".to_string(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
        }
    }
}
