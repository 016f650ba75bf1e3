use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Invalid field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Schema drift between fitted artifacts and serving schema: {detail}")]
    SchemaDrift { detail: String },

    #[error("Failed to load artifact '{path}': {detail}")]
    ArtifactLoad { path: String, detail: String },

    #[error("Prediction ledger schema missing: {0}")]
    LedgerSchemaMissing(String),

    #[error("Inference fault: {detail}")]
    Inference { detail: String },

    #[error("Ledger append failed: {0}")]
    LedgerWrite(rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type ScoreResult<T> = Result<T, ScoreError>;
