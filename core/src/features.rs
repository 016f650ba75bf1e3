//! Feature derivation — raw customer attributes to engineered attributes.
//!
//! RULE: derivation is a pure, total function. A malformed or missing
//! numeric degrades that one field to "missing"; it never fails the
//! request. The fitted transformer imputes missing values downstream.
//!
//! The derived field names (avg_monthly_spend, tenure_band, addon_count)
//! are part of the schema contract with the fitted transformer and must
//! match the names used at training time exactly.

use crate::error::{ScoreError, ScoreResult};
use serde::{Deserialize, Deserializer, Serialize};

/// The six add-on services counted into `addon_count`.
pub const ADDON_SERVICES: [&str; 6] = [
    "online_security",
    "online_backup",
    "device_protection",
    "tech_support",
    "streaming_tv",
    "streaming_movies",
];

/// Raw customer attributes as submitted by the caller.
///
/// Mirrors the training dataset's column names. `total_charges` arrives
/// as text in the historical extract, so it tolerates numeric strings
/// and blanks on the wire; anything unparseable becomes missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAttributes {
    pub gender: String,
    pub senior_citizen: i64,
    pub partner: String,
    pub dependents: String,
    pub country: String,
    pub state: String,

    pub contract_type: String,
    pub paperless_billing: String,
    pub payment_method: String,

    pub phone_service: String,
    pub multiple_lines: String,
    pub internet_service: String,
    pub online_security: String,
    pub online_backup: String,
    pub device_protection: String,
    pub tech_support: String,
    pub streaming_tv: String,
    pub streaming_movies: String,

    pub tenure_months: i64,
    pub monthly_charges: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub total_charges: Option<f64>,
    pub cltv: f64,
}

impl CustomerAttributes {
    /// Check the input contract. Failures reject the request before any
    /// inference; no ledger entry is written for a rejected request.
    pub fn validate(&self) -> ScoreResult<()> {
        if self.tenure_months < 0 {
            return Err(ScoreError::Validation {
                field: "tenure_months",
                reason: format!("must be >= 0, got {}", self.tenure_months),
            });
        }
        if !(0..=1).contains(&self.senior_citizen) {
            return Err(ScoreError::Validation {
                field: "senior_citizen",
                reason: format!("must be 0 or 1, got {}", self.senior_citizen),
            });
        }
        if !self.monthly_charges.is_finite() || self.monthly_charges < 0.0 {
            return Err(ScoreError::Validation {
                field: "monthly_charges",
                reason: format!("must be a finite value >= 0, got {}", self.monthly_charges),
            });
        }
        if !self.cltv.is_finite() || self.cltv < 0.0 {
            return Err(ScoreError::Validation {
                field: "cltv",
                reason: format!("must be a finite value >= 0, got {}", self.cltv),
            });
        }
        if let Some(total) = self.total_charges {
            if total < 0.0 {
                return Err(ScoreError::Validation {
                    field: "total_charges",
                    reason: format!("must be >= 0 when present, got {total}"),
                });
            }
        }
        Ok(())
    }
}

/// CustomerAttributes plus the derived fields the model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeredAttributes {
    #[serde(flatten)]
    pub customer: CustomerAttributes,
    pub avg_monthly_spend: Option<f64>,
    pub tenure_band: &'static str,
    pub addon_count: i64,
}

impl EngineeredAttributes {
    /// Derive engineered attributes. Deterministic; same input, same output.
    pub fn derive(customer: &CustomerAttributes) -> Self {
        Self {
            customer: customer.clone(),
            avg_monthly_spend: avg_monthly_spend(customer.tenure_months, customer.total_charges),
            tenure_band: tenure_band(customer.tenure_months),
            addon_count: addon_count(customer),
        }
    }

    /// Look up a numeric feature by its fitted column name.
    /// Missing values return None and are imputed by the transformer.
    pub fn numeric_value(&self, name: &str) -> Option<f64> {
        match name {
            "tenure_months" => Some(self.customer.tenure_months as f64),
            "monthly_charges" => Some(self.customer.monthly_charges),
            "total_charges" => self.customer.total_charges,
            "cltv" => Some(self.customer.cltv),
            "avg_monthly_spend" => self.avg_monthly_spend,
            "addon_count" => Some(self.addon_count as f64),
            _ => None,
        }
    }

    /// Look up a categorical feature by its fitted column name.
    pub fn categorical_value(&self, name: &str) -> Option<&str> {
        let c = &self.customer;
        let value = match name {
            "gender" => &c.gender,
            "partner" => &c.partner,
            "dependents" => &c.dependents,
            "country" => &c.country,
            "state" => &c.state,
            "contract_type" => &c.contract_type,
            "paperless_billing" => &c.paperless_billing,
            "payment_method" => &c.payment_method,
            "phone_service" => &c.phone_service,
            "multiple_lines" => &c.multiple_lines,
            "internet_service" => &c.internet_service,
            "online_security" => &c.online_security,
            "online_backup" => &c.online_backup,
            "device_protection" => &c.device_protection,
            "tech_support" => &c.tech_support,
            "streaming_tv" => &c.streaming_tv,
            "streaming_movies" => &c.streaming_movies,
            "tenure_band" => return Some(self.tenure_band),
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Average spend per month of tenure.
///
/// Matches training-time behavior bit-for-bit on policy: exactly 0.0 for
/// zero-tenure customers, missing when the division is undefined or
/// non-finite. Never NaN or infinite.
fn avg_monthly_spend(tenure_months: i64, total_charges: Option<f64>) -> Option<f64> {
    if tenure_months <= 0 {
        return Some(0.0);
    }
    let spend = total_charges? / tenure_months as f64;
    spend.is_finite().then_some(spend)
}

/// Fixed tenure buckets; boundary values 12, 24, 48 fall in the lower band.
fn tenure_band(tenure_months: i64) -> &'static str {
    match tenure_months {
        i64::MIN..=12 => "0-12",
        13..=24 => "13-24",
        25..=48 => "25-48",
        _ => "49+",
    }
}

/// Count of add-on services the customer subscribes to.
/// Only an exact "Yes" counts; "No" and "No internet service" do not.
fn addon_count(customer: &CustomerAttributes) -> i64 {
    [
        &customer.online_security,
        &customer.online_backup,
        &customer.device_protection,
        &customer.tech_support,
        &customer.streaming_tv,
        &customer.streaming_movies,
    ]
    .iter()
    .filter(|v| v.as_str() == "Yes")
    .count() as i64
}

/// Accept a number, a numeric string, or nothing. The historical extract
/// stores total_charges as text with blanks for brand-new customers, so a
/// single malformed field maps to missing instead of failing the request.
fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Num(n)) if n.is_finite() => Some(n),
        Some(Raw::Num(_)) => None,
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        None => None,
    })
}
