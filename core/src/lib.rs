//! Telco churn scoring core.
//!
//! Scores individual customers for churn risk: validated request →
//! deterministic feature derivation → fitted transformation into a
//! fixed-shape vector → probability inference via a pre-trained opaque
//! classifier → threshold decisioning → append-only prediction ledger
//! with windowed aggregate monitoring.
//!
//! The HTTP layer, the offline training pipeline, and the warehouse ETL
//! are external collaborators; this crate is the serving core they wrap.

pub mod config;
pub mod error;
pub mod features;
pub mod policy;
pub mod predictor;
pub mod service;
pub mod store;
pub mod transform;
pub mod types;

pub use config::ScoringConfig;
pub use error::{ScoreError, ScoreResult};
pub use features::{CustomerAttributes, EngineeredAttributes};
pub use policy::{decide, Decision, Mode};
pub use predictor::{ArtifactBundle, LinearModel, Predictor};
pub use service::{ScoringRequest, ScoringResponse, ScoringService};
pub use store::{LedgerEntry, PredictionStore, WindowSummary};
pub use transform::FittedTransformer;
