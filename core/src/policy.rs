//! Decision policy — probability plus caller-selected mode to a binary flag.
//!
//! Stateless and independent of the predictor. The threshold boundary is
//! inclusive: a probability exactly equal to the threshold churns.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_THRESHOLD: f64 = 0.48;
pub const AGGRESSIVE_THRESHOLD: f64 = 0.28;

/// Decisioning aggressiveness. Unrecognized values decode as `Default`,
/// so a bad mode string degrades to the conservative threshold instead
/// of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Aggressive,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::Aggressive => "aggressive",
        }
    }

    /// Anything other than a known mode falls back to `Default`.
    pub fn parse_lossy(s: &str) -> Mode {
        match s {
            "aggressive" => Mode::Aggressive,
            _ => Mode::Default,
        }
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Mode::parse_lossy(&raw))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn threshold_for(mode: Mode) -> f64 {
    match mode {
        Mode::Aggressive => AGGRESSIVE_THRESHOLD,
        Mode::Default => DEFAULT_THRESHOLD,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub threshold: f64,
    pub churn_flag: i64,
}

pub fn decide(probability: f64, mode: Mode) -> Decision {
    let threshold = threshold_for(mode);
    Decision {
        threshold,
        churn_flag: i64::from(probability >= threshold),
    }
}
