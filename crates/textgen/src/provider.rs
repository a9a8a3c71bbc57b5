use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub base_url: String,
    pub model: String,
}

/// A hosted text-generation endpoint: one prompt in, one completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
    fn info(&self) -> GeneratorInfo;
}

