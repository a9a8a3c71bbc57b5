use anyhow::{bail, Result};

use feedback::{FeedbackConfig, DEFAULT_DATA_FILE};
use textgen::{parse_opt, GeneratorConfig};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_file: String,
    pub bind_addr: String,
    pub generator: GeneratorConfig,
    pub feedback: FeedbackConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let generator = GeneratorConfig::from_env()?;

        let data_file = std::env::var("FEEDBACK_DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string());
        let bind_addr = std::env::var("FEEDBACK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let mut feedback = FeedbackConfig::default();
        if let Some(t) = parse_opt::<f32>("FEEDBACK_TEMP_REPLY")? {
            feedback.reply_temperature = t;
        }
        if let Some(t) = parse_opt::<f32>("FEEDBACK_TEMP_SUMMARY")? {
            feedback.summary_temperature = t;
        }
        if let Some(t) = parse_opt::<f32>("FEEDBACK_TEMP_ACTION")? {
            feedback.action_temperature = t;
        }

        for t in [feedback.reply_temperature, feedback.summary_temperature, feedback.action_temperature] {
            if !(0.0..=2.0).contains(&t) {
                bail!("FEEDBACK_TEMP_* values must be within 0.0..=2.0 (got {t})");
            }
        }

        Ok(Self { data_file, bind_addr, generator, feedback })
    }
}
