use serde::{Deserialize, Serialize};

/// Tunable shares applied to the requested amount and contract value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Ceiling of start advance plus credit, as a share of the contract amount.
    pub max_credit_share: f64,
    /// Share of the requested amount an institutional guarantee is assumed to cover.
    pub institutional_coverage_share: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_credit_share: 0.70,
            institutional_coverage_share: 0.50,
        }
    }
}
