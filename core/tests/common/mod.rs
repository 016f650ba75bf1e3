//! Shared fixtures: a small fitted transformer over the full serving
//! schema, a fixed-output predictor stub, and a canonical customer.
#![allow(dead_code)]

use churnscore_core::transform::{
    CategoricalColumn, FittedTransformer, NumericColumn, TransformerArtifact,
    CATEGORICAL_FEATURES, NUMERIC_FEATURES,
};
use churnscore_core::{
    ArtifactBundle, CustomerAttributes, Predictor, PredictionStore, ScoreResult, ScoringService,
};

pub fn vocabulary_for(name: &str) -> Vec<String> {
    let values: &[&str] = match name {
        "gender" => &["Female", "Male"],
        "country" => &["United States"],
        "state" => &["California", "New York", "Texas"],
        "contract_type" => &["Month-to-month", "One year", "Two year"],
        "payment_method" => &[
            "Bank transfer (automatic)",
            "Credit card (automatic)",
            "Electronic check",
            "Mailed check",
        ],
        "multiple_lines" => &["No", "No phone service", "Yes"],
        "internet_service" => &["DSL", "Fiber optic", "No"],
        "online_security" | "online_backup" | "device_protection" | "tech_support"
        | "streaming_tv" | "streaming_movies" => &["No", "No internet service", "Yes"],
        "tenure_band" => &["0-12", "13-24", "25-48", "49+"],
        _ => &["No", "Yes"],
    };
    values.iter().map(|v| v.to_string()).collect()
}

/// A fitted artifact over the full serving schema with round medians.
pub fn test_artifact() -> TransformerArtifact {
    let numeric = NUMERIC_FEATURES
        .iter()
        .map(|name| NumericColumn {
            name: name.to_string(),
            median: 10.0,
        })
        .collect();
    let categorical = CATEGORICAL_FEATURES
        .iter()
        .map(|name| {
            let vocabulary = vocabulary_for(name);
            CategoricalColumn {
                name: name.to_string(),
                mode: vocabulary[0].clone(),
                vocabulary,
            }
        })
        .collect();

    let mut artifact = TransformerArtifact {
        version: "test".to_string(),
        schema_fingerprint: String::new(),
        numeric,
        categorical,
    };
    artifact.schema_fingerprint = artifact.compute_fingerprint();
    artifact
}

pub fn test_transformer() -> FittedTransformer {
    FittedTransformer::from_artifact(test_artifact()).unwrap()
}

/// Predictor stub returning a constant, whatever that constant is.
/// Out-of-range constants exercise the service's inference guard.
pub struct FixedPredictor {
    pub probability: f64,
    pub n_features: usize,
}

impl Predictor for FixedPredictor {
    fn name(&self) -> &str {
        "fixed"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, _features: &[f64]) -> ScoreResult<f64> {
        Ok(self.probability)
    }
}

/// A service over an in-memory ledger whose predictor always returns
/// `probability`.
pub fn service_with(probability: f64) -> ScoringService {
    let transformer = test_transformer();
    let n_features = transformer.output_dim();
    let bundle = ArtifactBundle::new(
        transformer,
        Box::new(FixedPredictor {
            probability,
            n_features,
        }),
    )
    .unwrap();

    let store = PredictionStore::in_memory().unwrap();
    store.migrate().unwrap();
    ScoringService::new(bundle, store).unwrap()
}

/// Tenure-5 fiber customer from the scoring scenario: 450.0 total over
/// 5 months gives avg_monthly_spend 90.0 in band "0-12".
pub fn sample_customer() -> CustomerAttributes {
    CustomerAttributes {
        gender: "Female".to_string(),
        senior_citizen: 0,
        partner: "No".to_string(),
        dependents: "No".to_string(),
        country: "United States".to_string(),
        state: "California".to_string(),
        contract_type: "Month-to-month".to_string(),
        paperless_billing: "Yes".to_string(),
        payment_method: "Electronic check".to_string(),
        phone_service: "Yes".to_string(),
        multiple_lines: "No".to_string(),
        internet_service: "Fiber optic".to_string(),
        online_security: "No".to_string(),
        online_backup: "Yes".to_string(),
        device_protection: "No".to_string(),
        tech_support: "No".to_string(),
        streaming_tv: "Yes".to_string(),
        streaming_movies: "No".to_string(),
        tenure_months: 5,
        monthly_charges: 95.2,
        total_charges: Some(450.0),
        cltv: 3200.0,
    }
}
