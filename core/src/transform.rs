//! Fitted feature transformer — engineered attributes to a fixed-shape
//! numeric vector.
//!
//! The transformation (column order, imputation statistics, one-hot
//! vocabulary) was frozen at fit time and ships as a versioned JSON
//! artifact. Loading asserts the artifact's column set against the
//! serving-side schema constants: a mismatch is schema drift, which is
//! fatal at startup and never retried.
//!
//! Vector layout: the numeric block in fitted order, then one one-hot
//! block per categorical column in fitted order. Unknown categorical
//! values encode as an all-zero block (the encoder's ignore-unknown
//! policy); missing values take the fitted median / mode.

use crate::error::{ScoreError, ScoreResult};
use crate::features::EngineeredAttributes;
use serde::{Deserialize, Serialize};

/// Numeric columns the transformer was fitted against, in column order.
pub const NUMERIC_FEATURES: [&str; 6] = [
    "tenure_months",
    "monthly_charges",
    "total_charges",
    "cltv",
    "avg_monthly_spend",
    "addon_count",
];

/// Categorical columns the transformer was fitted against, in column order.
/// `tenure_band` is produced by feature derivation, not by the caller.
pub const CATEGORICAL_FEATURES: [&str; 18] = [
    "gender",
    "partner",
    "dependents",
    "country",
    "state",
    "contract_type",
    "paperless_billing",
    "payment_method",
    "phone_service",
    "multiple_lines",
    "internet_service",
    "online_security",
    "online_backup",
    "device_protection",
    "tech_support",
    "streaming_tv",
    "streaming_movies",
    "tenure_band",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    /// Imputation value for missing numerics, fitted on the training set.
    pub median: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    /// Imputation value for missing categoricals (most frequent at fit time).
    pub mode: String,
    /// One-hot vocabulary in encoding order.
    pub vocabulary: Vec<String>,
}

/// The serialized form of a fitted transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerArtifact {
    pub version: String,
    pub schema_fingerprint: String,
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
}

impl TransformerArtifact {
    /// FNV-1a over the fitted column names, numeric block first.
    /// The model artifact carries the same fingerprint so a mismatched
    /// transformer/model pair fails loudly at load instead of silently
    /// scoring against the wrong columns.
    pub fn compute_fingerprint(&self) -> String {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = OFFSET;
        let names = self
            .numeric
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.categorical.iter().map(|c| c.name.as_str()));
        for name in names {
            for byte in name.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(PRIME);
            }
            hash ^= b'\n' as u64;
            hash = hash.wrapping_mul(PRIME);
        }
        format!("{hash:016x}")
    }
}

/// A fitted transformer, loaded once at process start and immutable for
/// the life of the process.
#[derive(Debug)]
pub struct FittedTransformer {
    artifact: TransformerArtifact,
}

impl FittedTransformer {
    pub fn load(path: &str) -> ScoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoreError::ArtifactLoad {
            path: path.to_string(),
            detail: e.to_string(),
        })?;
        let artifact: TransformerArtifact =
            serde_json::from_str(&content).map_err(|e| ScoreError::ArtifactLoad {
                path: path.to_string(),
                detail: e.to_string(),
            })?;
        Self::from_artifact(artifact)
    }

    /// Validate the artifact against the serving-side schema and wrap it.
    pub fn from_artifact(artifact: TransformerArtifact) -> ScoreResult<Self> {
        let numeric_names: Vec<&str> = artifact.numeric.iter().map(|c| c.name.as_str()).collect();
        if numeric_names != NUMERIC_FEATURES {
            return Err(ScoreError::SchemaDrift {
                detail: format!(
                    "numeric columns fitted as {numeric_names:?}, serving schema is {NUMERIC_FEATURES:?}"
                ),
            });
        }

        let categorical_names: Vec<&str> =
            artifact.categorical.iter().map(|c| c.name.as_str()).collect();
        if categorical_names != CATEGORICAL_FEATURES {
            return Err(ScoreError::SchemaDrift {
                detail: format!(
                    "categorical columns fitted as {categorical_names:?}, serving schema is {CATEGORICAL_FEATURES:?}"
                ),
            });
        }

        for column in &artifact.categorical {
            if column.vocabulary.is_empty() {
                return Err(ScoreError::SchemaDrift {
                    detail: format!("column '{}' has an empty vocabulary", column.name),
                });
            }
        }

        let expected = artifact.compute_fingerprint();
        if artifact.schema_fingerprint != expected {
            return Err(ScoreError::SchemaDrift {
                detail: format!(
                    "artifact declares fingerprint {} but its columns hash to {expected}",
                    artifact.schema_fingerprint
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

    /// Length of every vector this transformer produces.
    pub fn output_dim(&self) -> usize {
        self.artifact.numeric.len()
            + self
                .artifact
                .categorical
                .iter()
                .map(|c| c.vocabulary.len())
                .sum::<usize>()
    }

    /// Produce the model input vector. Infallible by construction: every
    /// missing value has a fitted imputation and unknown categories encode
    /// as zeros.
    pub fn transform(&self, attributes: &EngineeredAttributes) -> Vec<f64> {
        let mut vector = Vec::with_capacity(self.output_dim());

        for column in &self.artifact.numeric {
            let value = attributes
                .numeric_value(&column.name)
                .filter(|v| v.is_finite())
                .unwrap_or(column.median);
            vector.push(value);
        }

        for column in &self.artifact.categorical {
            let value = attributes
                .categorical_value(&column.name)
                .filter(|v| !v.is_empty())
                .unwrap_or(&column.mode);
            for candidate in &column.vocabulary {
                vector.push(if candidate == value { 1.0 } else { 0.0 });
            }
        }

        vector
    }
}
