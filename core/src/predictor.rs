//! Predictor capability and the fitted artifact pair.
//!
//! The core treats the classifier as opaque: anything that maps a numeric
//! vector of the fitted shape to a probability in [0, 1]. The shipped
//! implementation is a serialized logistic model, but the service only
//! depends on the `Predictor` trait, so tests substitute stubs freely.

use crate::error::{ScoreError, ScoreResult};
use crate::transform::FittedTransformer;
use serde::{Deserialize, Serialize};

/// The opaque classifier capability.
///
/// Loaded once at process start; read-only and shared across concurrent
/// requests for the life of the process.
pub trait Predictor: Send + Sync {
    /// Stable name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Input vector length this predictor was trained on.
    fn n_features(&self) -> usize;

    /// Churn probability in [0, 1] for one input vector.
    fn predict_proba(&self, features: &[f64]) -> ScoreResult<f64>;
}

/// Serialized form of the shipped logistic model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    /// Must match the transformer artifact it was trained against.
    pub schema_fingerprint: String,
    pub n_features: usize,
    pub intercept: f64,
    pub weights: Vec<f64>,
}

pub struct LinearModel {
    artifact: ModelArtifact,
}

impl LinearModel {
    pub fn load(path: &str) -> ScoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoreError::ArtifactLoad {
            path: path.to_string(),
            detail: e.to_string(),
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&content).map_err(|e| ScoreError::ArtifactLoad {
                path: path.to_string(),
                detail: e.to_string(),
            })?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> ScoreResult<Self> {
        if artifact.weights.len() != artifact.n_features {
            return Err(ScoreError::SchemaDrift {
                detail: format!(
                    "model declares {} features but carries {} weights",
                    artifact.n_features,
                    artifact.weights.len()
                ),
            });
        }
        Ok(Self { artifact })
    }

    pub fn version(&self) -> &str {
        &self.artifact.version
    }

    pub fn schema_fingerprint(&self) -> &str {
        &self.artifact.schema_fingerprint
    }
}

impl Predictor for LinearModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn n_features(&self) -> usize {
        self.artifact.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> ScoreResult<f64> {
        if features.len() != self.artifact.n_features {
            return Err(ScoreError::Inference {
                detail: format!(
                    "expected {} features, got {}",
                    self.artifact.n_features,
                    features.len()
                ),
            });
        }

        let logit: f64 = self.artifact.intercept
            + features
                .iter()
                .zip(&self.artifact.weights)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        if !logit.is_finite() {
            return Err(ScoreError::Inference {
                detail: "non-finite logit".to_string(),
            });
        }

        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}

/// The versioned transformer/model pair, loaded exactly once at startup.
///
/// Construction cross-checks the two artifacts: their schema fingerprints
/// must agree and the transformer's output shape must match the model's
/// input shape. A mismatched pair is a startup failure, not a runtime
/// surprise.
pub struct ArtifactBundle {
    pub transformer: FittedTransformer,
    pub predictor: Box<dyn Predictor>,
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("transformer", &self.transformer)
            .field("predictor", &self.predictor.name())
            .finish()
    }
}

impl ArtifactBundle {
    pub fn load(transformer_path: &str, model_path: &str) -> ScoreResult<Self> {
        let transformer = FittedTransformer::load(transformer_path)?;
        let model = LinearModel::load(model_path)?;

        if transformer.schema_fingerprint() != model.schema_fingerprint() {
            return Err(ScoreError::SchemaDrift {
                detail: format!(
                    "transformer fingerprint {} != model fingerprint {}",
                    transformer.schema_fingerprint(),
                    model.schema_fingerprint()
                ),
            });
        }

        log::info!(
            "artifact pair loaded: transformer v{}, model v{} ({} features)",
            transformer.version(),
            model.version(),
            model.n_features(),
        );

        Self::new(transformer, Box::new(model))
    }

    /// Pair a transformer with any predictor, checking shapes agree.
    pub fn new(transformer: FittedTransformer, predictor: Box<dyn Predictor>) -> ScoreResult<Self> {
        if transformer.output_dim() != predictor.n_features() {
            return Err(ScoreError::SchemaDrift {
                detail: format!(
                    "transformer produces {} columns but predictor '{}' expects {}",
                    transformer.output_dim(),
                    predictor.name(),
                    predictor.n_features()
                ),
            });
        }
        Ok(Self {
            transformer,
            predictor,
        })
    }
}
