use churnscore_core::{CustomerAttributes, EngineeredAttributes, ScoreError};

mod common;
use common::sample_customer;

// ── Derivation ───────────────────────────────────────────────────────────────

/// derive() is deterministic: identical input, identical output.
#[test]
fn derivation_is_deterministic() {
    let customer = sample_customer();

    let first = EngineeredAttributes::derive(&customer);
    let second = EngineeredAttributes::derive(&customer);

    assert_eq!(first, second);
}

/// Scenario: tenure=5 with total 450.0 gives avg spend 90.0 in band "0-12".
#[test]
fn avg_monthly_spend_from_scenario() {
    let engineered = EngineeredAttributes::derive(&sample_customer());

    assert_eq!(engineered.avg_monthly_spend, Some(90.0));
    assert_eq!(engineered.tenure_band, "0-12");
}

/// Zero tenure maps to exactly 0.0, never a division blowup.
#[test]
fn avg_monthly_spend_is_zero_at_zero_tenure() {
    let mut customer = sample_customer();
    customer.tenure_months = 0;
    customer.total_charges = Some(450.0);

    let engineered = EngineeredAttributes::derive(&customer);

    assert_eq!(engineered.avg_monthly_spend, Some(0.0));
}

/// A missing total with positive tenure leaves the spend missing,
/// to be imputed downstream — never silently 0.
#[test]
fn avg_monthly_spend_missing_when_total_missing() {
    let mut customer = sample_customer();
    customer.total_charges = None;

    let engineered = EngineeredAttributes::derive(&customer);

    assert_eq!(engineered.avg_monthly_spend, None);
}

/// avg_monthly_spend is never NaN or infinite for any tenure >= 0.
#[test]
fn avg_monthly_spend_always_finite_or_missing() {
    for tenure in [0, 1, 5, 12, 48, 1200] {
        for total in [None, Some(0.0), Some(450.0), Some(8684.8)] {
            let mut customer = sample_customer();
            customer.tenure_months = tenure;
            customer.total_charges = total;

            let engineered = EngineeredAttributes::derive(&customer);
            if let Some(spend) = engineered.avg_monthly_spend {
                assert!(
                    spend.is_finite(),
                    "non-finite spend for tenure={tenure} total={total:?}"
                );
            }
        }
    }
}

/// Boundary values 12, 24, 48 belong to the lower band; every tenure
/// lands in exactly one of the four labels.
#[test]
fn tenure_band_boundaries() {
    let banded = |tenure: i64| {
        let mut customer = sample_customer();
        customer.tenure_months = tenure;
        EngineeredAttributes::derive(&customer).tenure_band
    };

    assert_eq!(banded(0), "0-12");
    assert_eq!(banded(12), "0-12");
    assert_eq!(banded(13), "13-24");
    assert_eq!(banded(24), "13-24");
    assert_eq!(banded(25), "25-48");
    assert_eq!(banded(48), "25-48");
    assert_eq!(banded(49), "49+");
    assert_eq!(banded(1200), "49+");
}

/// Only an exact "Yes" counts toward addon_count.
#[test]
fn addon_count_counts_exact_yes_only() {
    let mut customer = sample_customer();
    customer.online_security = "Yes".to_string();
    customer.online_backup = "Yes".to_string();
    customer.device_protection = "No".to_string();
    customer.tech_support = "No internet service".to_string();
    customer.streaming_tv = "Yes".to_string();
    customer.streaming_movies = "No".to_string();

    let engineered = EngineeredAttributes::derive(&customer);

    assert_eq!(engineered.addon_count, 3);
}

// ── Wire format ──────────────────────────────────────────────────────────────

fn payload_with_total(total_json: &str) -> String {
    format!(
        r#"{{
            "gender": "Female", "senior_citizen": 0, "partner": "No",
            "dependents": "No", "country": "United States", "state": "California",
            "contract_type": "Month-to-month", "paperless_billing": "Yes",
            "payment_method": "Electronic check", "phone_service": "Yes",
            "multiple_lines": "No", "internet_service": "Fiber optic",
            "online_security": "No", "online_backup": "No",
            "device_protection": "No", "tech_support": "No",
            "streaming_tv": "No", "streaming_movies": "No",
            "tenure_months": 5, "monthly_charges": 95.2,
            "total_charges": {total_json}, "cltv": 3200.0
        }}"#
    )
}

/// total_charges arrives as text in the historical extract; numeric
/// strings parse, blanks and garbage degrade to missing.
#[test]
fn total_charges_tolerates_text() {
    let parse = |total_json: &str| -> Option<f64> {
        let customer: CustomerAttributes =
            serde_json::from_str(&payload_with_total(total_json)).unwrap();
        customer.total_charges
    };

    assert_eq!(parse("450.0"), Some(450.0));
    assert_eq!(parse("\"450.0\""), Some(450.0));
    assert_eq!(parse("\" 450.0 \""), Some(450.0));
    assert_eq!(parse("\"\""), None);
    assert_eq!(parse("\"n/a\""), None);
    assert_eq!(parse("null"), None);
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn negative_tenure_is_rejected() {
    let mut customer = sample_customer();
    customer.tenure_months = -1;

    let err = customer.validate().unwrap_err();
    assert!(matches!(
        err,
        ScoreError::Validation {
            field: "tenure_months",
            ..
        }
    ));
}

#[test]
fn out_of_contract_numerics_are_rejected() {
    let mut negative_charge = sample_customer();
    negative_charge.monthly_charges = -0.01;
    assert!(negative_charge.validate().is_err());

    let mut negative_cltv = sample_customer();
    negative_cltv.cltv = -5.0;
    assert!(negative_cltv.validate().is_err());

    let mut bad_senior = sample_customer();
    bad_senior.senior_citizen = 2;
    assert!(bad_senior.validate().is_err());

    let mut negative_total = sample_customer();
    negative_total.total_charges = Some(-1.0);
    assert!(negative_total.validate().is_err());
}

#[test]
fn valid_customer_passes_validation() {
    assert!(sample_customer().validate().is_ok());

    let mut no_total = sample_customer();
    no_total.total_charges = None;
    assert!(no_total.validate().is_ok());
}
