//! Scoring service — per-request orchestration of the pipeline.
//!
//! Per request: validate → derive → transform → predict → decide →
//! append to ledger → respond. No state is carried across requests.
//!
//! Ledger policy: the append runs synchronously before the response is
//! built, but a failed append does not overturn an already-decided
//! result — the failure is logged at error level and the caller still
//! receives the response. Nothing earlier than a fully-decided result is
//! ever written.

use crate::error::{ScoreError, ScoreResult};
use crate::features::{CustomerAttributes, EngineeredAttributes};
use crate::policy::{decide, Mode};
use crate::predictor::ArtifactBundle;
use crate::store::{LedgerEntry, PredictionStore, WindowSummary};
use crate::types::RequestId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scoring call: the raw customer attributes plus the decisioning mode.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRequest {
    #[serde(flatten)]
    pub customer: CustomerAttributes,
    #[serde(default)]
    pub mode: Mode,
}

/// The immutable outcome of one scoring call.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResponse {
    pub request_id: RequestId,
    pub mode: Mode,
    pub threshold: f64,
    pub churn_probability: f64,
    pub churn_flag: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub struct ScoringService {
    bundle: ArtifactBundle,
    store: PredictionStore,
}

impl std::fmt::Debug for ScoringService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringService")
            .field("bundle", &self.bundle)
            .finish_non_exhaustive()
    }
}

impl ScoringService {
    /// Build the service around an already-loaded artifact pair and an
    /// already-migrated ledger. A missing ledger schema is fatal here:
    /// the process must not serve traffic it cannot log.
    pub fn new(bundle: ArtifactBundle, store: PredictionStore) -> ScoreResult<Self> {
        if !store.schema_present()? {
            return Err(ScoreError::LedgerSchemaMissing(
                "table 'prediction_log' not found; run migrations before serving".to_string(),
            ));
        }
        Ok(Self { bundle, store })
    }

    /// Process liveness.
    pub fn health(&self) -> Health {
        Health { status: "ok" }
    }

    /// Score one request end to end.
    ///
    /// Validation failures and inference faults leave no trace in the
    /// ledger; only fully-decided results are appended.
    pub fn score(&self, request: &ScoringRequest) -> ScoreResult<ScoringResponse> {
        request.customer.validate()?;

        let engineered = EngineeredAttributes::derive(&request.customer);
        let vector = self.bundle.transformer.transform(&engineered);
        let probability = self.bundle.predictor.predict_proba(&vector)?;

        // Guard arbitrary Predictor implementations, not just the shipped one.
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ScoreError::Inference {
                detail: format!(
                    "predictor '{}' returned {probability}, outside [0, 1]",
                    self.bundle.predictor.name()
                ),
            });
        }

        let decision = decide(probability, request.mode);
        let request_id = Uuid::new_v4().to_string();

        let entry = LedgerEntry {
            id: None,
            ts_utc: Utc::now(),
            request_id: request_id.clone(),
            mode: request.mode,
            threshold: decision.threshold,
            churn_probability: probability,
            churn_flag: decision.churn_flag,
        };
        match self.store.append_prediction(&entry) {
            Ok(id) => log::debug!(
                "scored request {request_id}: p={probability:.4} flag={} (ledger id {id})",
                decision.churn_flag,
            ),
            // Best-effort durability: surface the failure, keep the result.
            Err(e) => log::error!("ledger append failed for request {request_id}: {e}"),
        }

        Ok(ScoringResponse {
            request_id,
            mode: request.mode,
            threshold: decision.threshold,
            churn_probability: probability,
            churn_flag: decision.churn_flag,
        })
    }

    /// Aggregate the most recent `limit` ledger entries per flag.
    pub fn monitoring_summary(&self, limit: i64) -> ScoreResult<WindowSummary> {
        self.store.window_summary(limit)
    }

    /// Direct ledger access for tooling and tests.
    pub fn store(&self) -> &PredictionStore {
        &self.store
    }
}

/// Convenience for stubbing the mode in tests and tooling.
impl ScoringRequest {
    pub fn with_mode(customer: CustomerAttributes, mode: Mode) -> Self {
        Self { customer, mode }
    }
}
