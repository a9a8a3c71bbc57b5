use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use evaluation::{builtin_strategies, compare, load_csv, render_table, EvalConfig, Evaluator, BUILTIN_STRATEGIES};
use textgen::{GeneratorConfig, OpenAiCompatGenerator, RetryingGenerator, TextGenerator};

/// Score star-rating prompt strategies against a labelled review dataset.
#[derive(Parser, Debug)]
#[command(name = "rating-eval")]
struct Args {
    /// CSV file with `text` and `stars` columns
    dataset: PathBuf,

    /// Only evaluate the first N rows
    #[arg(long)]
    limit: Option<usize>,

    /// Delay between model calls, in milliseconds
    #[arg(long, default_value_t = 400)]
    pacing_ms: u64,

    /// Strategy to run (repeatable); defaults to all built-ins
    #[arg(long = "strategy")]
    strategies: Vec<String>,

    /// Sampling temperature for every strategy
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    for name in &args.strategies {
        if !BUILTIN_STRATEGIES.iter().any(|(n, _)| n == name) {
            let known: Vec<_> = BUILTIN_STRATEGIES.iter().map(|(n, _)| *n).collect();
            bail!("Unknown strategy {name:?}; expected one of {known:?}");
        }
    }

    let dataset = load_csv(&args.dataset, args.limit)
        .with_context(|| format!("Failed to load dataset {}", args.dataset.display()))?;
    info!(rows = dataset.len(), fingerprint = %dataset.fingerprint_hex(), "dataset: loaded");

    let gen_cfg = GeneratorConfig::from_env()?;
    let client = OpenAiCompatGenerator::new(&gen_cfg).context("Failed to build LLM client")?;
    let generator: Arc<dyn TextGenerator> = Arc::new(RetryingGenerator::new(client, gen_cfg.retry.clone()));

    let strategies = builtin_strategies(generator, args.temperature, &args.strategies);
    let evaluator = Evaluator::new(EvalConfig {
        pacing: Duration::from_millis(args.pacing_ms),
        ..EvalConfig::default()
    });

    let results = compare(&evaluator, &strategies, dataset.rows()).await?;

    if args.json {
        let out = serde_json::json!({
            "dataset": args.dataset.display().to_string(),
            "dataset_blake3": dataset.fingerprint_hex(),
            "rows": dataset.len(),
            "model": gen_cfg.model,
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_table(&results));
    }

    Ok(())
}
