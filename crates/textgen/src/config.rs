use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = get("OPENROUTER_API_KEY")?;
        let mut cfg = Self::new(api_key);

        if let Ok(v) = std::env::var("LLM_BASE_URL") {
            cfg.base_url = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL") {
            cfg.model = v;
        }
        if let Some(secs) = parse_opt::<u64>("LLM_TIMEOUT_SECS")? {
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_opt::<u32>("LLM_MAX_ATTEMPTS")? {
            cfg.retry.max_attempts = n;
        }
        if let Some(ms) = parse_opt::<u64>("LLM_RETRY_BASE_MS")? {
            cfg.retry.base_delay = Duration::from_millis(ms);
        }

        // fail fast on obviously broken values
        if !cfg.base_url.starts_with("http://") && !cfg.base_url.starts_with("https://") {
            bail!("LLM_BASE_URL must start with http:// or https://");
        }
        if cfg.retry.max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }

        Ok(cfg)
    }
}

fn get(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing required env var: {key}"))
}

/// Optional numeric env var; present-but-unparseable is an error.
pub fn parse_opt<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => Ok(Some(v.trim().parse::<T>().with_context(|| format!("Invalid value for {key}: {v}"))?)),
        Err(_) => Ok(None),
    }
}
