//! Process configuration: where the artifact pair and the ledger live.
//!
//! Thresholds are compiled into the decision policy, not configured —
//! changing them is a deployment, same as changing the artifacts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub transformer: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub database_path: String,
    pub artifacts: ArtifactPaths,
}

impl ScoringConfig {
    /// Load from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ScoringConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            database_path: "data/churn_scoring.db".to_string(),
            artifacts: ArtifactPaths {
                transformer: "artifacts/transformer.json".to_string(),
                model: "artifacts/churn_model.json".to_string(),
            },
        }
    }
}
