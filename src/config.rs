use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tolerance used by matrix equality unless a caller supplies its own.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// How two entries are compared against the tolerance.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Reject when `|a - b| > tolerance`.
    #[default]
    Absolute,
    /// Reject only when `a - b > tolerance`. Not symmetric: `a` much smaller
    /// than `b` still compares equal. Kept for reproducing legacy results.
    OneSided,
}

impl ComparisonMode {
    /// Returns true when `a` and `b` differ by more than `tolerance`.
    #[inline]
    pub fn differs(self, a: f64, b: f64, tolerance: f64) -> bool {
        match self {
            ComparisonMode::Absolute => (a - b).abs() > tolerance,
            ComparisonMode::OneSided => a - b > tolerance,
        }
    }
}

impl FromStr for ComparisonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute" | "abs" => Ok(ComparisonMode::Absolute),
            "one_sided" | "onesided" | "one-sided" => Ok(ComparisonMode::OneSided),
            _ => Err(format!(
                "Unknown comparison mode: {}. Expected one of: absolute, one_sided",
                s
            )),
        }
    }
}

/// Settings for approximate matrix equality.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EqualityConfig {
    pub tolerance: f64,

    #[serde(default)]
    pub mode: ComparisonMode,
}

impl EqualityConfig {
    pub fn new(tolerance: f64, mode: ComparisonMode) -> Self {
        Self { tolerance, mode }
    }
}

impl Default for EqualityConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            mode: ComparisonMode::Absolute,
        }
    }
}
