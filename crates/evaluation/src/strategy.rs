use async_trait::async_trait;
use std::sync::Arc;
use textgen::TextGenerator;

/// Turns review text into raw (unparsed) model output.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, text: &str) -> anyhow::Result<String>;
}

/// Adapter for plain synchronous closures.
pub struct FnPredictor<F>(pub F);

#[async_trait]
impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    async fn predict(&self, text: &str) -> anyhow::Result<String> {
        Ok((self.0)(text))
    }
}

pub const REVIEW_PLACEHOLDER: &str = "{review}";

/// A prompt template run against a text generator.
pub struct PromptStrategy {
    name: String,
    template: String,
    temperature: f32,
    generator: Arc<dyn TextGenerator>,
}

impl PromptStrategy {
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        temperature: f32,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            temperature,
            generator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, review: &str) -> String {
        self.template.replace(REVIEW_PLACEHOLDER, review)
    }
}

#[async_trait]
impl Predictor for PromptStrategy {
    async fn predict(&self, text: &str) -> anyhow::Result<String> {
        let prompt = self.render(text);
        Ok(self.generator.generate(&prompt, self.temperature).await?)
    }
}

pub const ZERO_SHOT: &str = r#"You are a sentiment analysis assistant.

Read the following Yelp review and predict the star rating the customer gave, from 1 to 5.

Review: "{review}"

Respond ONLY with valid JSON in exactly this format:
{"predicted_stars": <integer 1-5>, "explanation": "<one short sentence>"}"#;

pub const FEW_SHOT: &str = r#"You predict Yelp star ratings (1-5) from review text.

Examples:
Review: "Absolutely terrible. Waited an hour and the food was cold."
{"predicted_stars": 1, "explanation": "Long wait and cold food."}

Review: "Decent place, nothing special. Prices are fair."
{"predicted_stars": 3, "explanation": "Neutral, average experience."}

Review: "Best tacos in town, friendly staff, will be back!"
{"predicted_stars": 5, "explanation": "Enthusiastic praise and intent to return."}

Now rate this review:
Review: "{review}"

Respond ONLY with valid JSON:
{"predicted_stars": <integer 1-5>, "explanation": "<one short sentence>"}"#;

pub const RUBRIC: &str = r#"You are an expert at reading customer reviews.

Use this rubric:
1 star: very negative, angry, would not return
2 stars: mostly negative with minor positives
3 stars: mixed or neutral
4 stars: mostly positive with minor complaints
5 stars: very positive, enthusiastic

Think about the overall tone, specific complaints and praise, and whether the
customer would return. Then decide on a single rating.

Review: "{review}"

Return ONLY valid JSON, with no text before or after it:
{"predicted_stars": <integer 1-5>, "explanation": "<brief reasoning>"}"#;

pub const BUILTIN_STRATEGIES: [(&str, &str); 3] = [
    ("zero_shot", ZERO_SHOT),
    ("few_shot", FEW_SHOT),
    ("rubric", RUBRIC),
];

/// Built-in strategies, optionally filtered by name, in their fixed order.
pub fn builtin_strategies(
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
    only: &[String],
) -> Vec<(String, Arc<dyn Predictor>)> {
    BUILTIN_STRATEGIES
        .iter()
        .filter(|(name, _)| only.is_empty() || only.iter().any(|o| o == name))
        .map(|(name, template)| {
            let s = PromptStrategy::new(*name, *template, temperature, generator.clone());
            (name.to_string(), Arc::new(s) as Arc<dyn Predictor>)
        })
        .collect()
}
