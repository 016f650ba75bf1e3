//! Shared primitive types used across the scoring core.

/// Surrogate key assigned by the prediction ledger on append.
pub type LedgerId = i64;

/// Per-request identifier (UUID v4), assigned fresh by the scoring service.
pub type RequestId = String;
