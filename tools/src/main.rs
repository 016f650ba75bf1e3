//! score-runner: headless scoring runner for the churn pipeline.
//!
//! Usage:
//!   score-runner --db data/churn_scoring.db --input request.json
//!   score-runner --config config.json --mode aggressive --summary 100
//!   score-runner --summary-only 500 --db data/churn_scoring.db

use anyhow::Result;
use churnscore_core::{
    config::ScoringConfig, ArtifactBundle, Mode, PredictionStore, ScoringRequest, ScoringService,
};
use std::env;

/// Built-in demo payload: a short-tenure fiber customer on a monthly
/// contract, the profile the model flags most often.
const DEMO_REQUEST: &str = r#"{
    "gender": "Female",
    "senior_citizen": 0,
    "partner": "No",
    "dependents": "No",
    "country": "United States",
    "state": "California",
    "contract_type": "Month-to-month",
    "paperless_billing": "Yes",
    "payment_method": "Electronic check",
    "phone_service": "Yes",
    "multiple_lines": "No",
    "internet_service": "Fiber optic",
    "online_security": "No",
    "online_backup": "No",
    "device_protection": "No",
    "tech_support": "No",
    "streaming_tv": "Yes",
    "streaming_movies": "No",
    "tenure_months": 5,
    "monthly_charges": 95.2,
    "total_charges": "450.0",
    "cltv": 3200.0,
    "mode": "default"
}"#;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match str_arg(&args, "--config") {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };

    let db = str_arg(&args, "--db").unwrap_or(&config.database_path);
    let transformer_path = str_arg(&args, "--transformer").unwrap_or(&config.artifacts.transformer);
    let model_path = str_arg(&args, "--model").unwrap_or(&config.artifacts.model);
    let summary_limit = num_arg(&args, "--summary", 0i64);
    let summary_only = num_arg(&args, "--summary-only", 0i64);

    let store = PredictionStore::open(db)?;
    store.migrate()?;

    let bundle = ArtifactBundle::load(transformer_path, model_path)?;
    let service = ScoringService::new(bundle, store)?;

    log::info!("scoring service ready (db: {db})");

    if summary_only > 0 {
        print_summary(&service, summary_only)?;
        return Ok(());
    }

    let payload = match str_arg(&args, "--input") {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?,
        None => DEMO_REQUEST.to_string(),
    };
    let mut request: ScoringRequest = serde_json::from_str(&payload)?;
    if let Some(mode) = str_arg(&args, "--mode") {
        request.mode = Mode::parse_lossy(mode);
    }

    let response = service.score(&request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if summary_limit > 0 {
        println!();
        print_summary(&service, summary_limit)?;
    }

    Ok(())
}

fn print_summary(service: &ScoringService, limit: i64) -> Result<()> {
    let summary = service.monitoring_summary(limit)?;
    let total = service.store().prediction_count()?;

    println!("=== MONITORING SUMMARY ===");
    println!("  ledger rows:  {total}");
    println!("  window size:  {}", summary.window_size);
    if summary.by_flag.is_empty() {
        println!("  (ledger empty)");
    }
    for agg in &summary.by_flag {
        println!(
            "  flag={} | count: {:>5} | mean probability: {:.4}",
            agg.churn_flag, agg.count, agg.avg_probability
        );
    }
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn num_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
