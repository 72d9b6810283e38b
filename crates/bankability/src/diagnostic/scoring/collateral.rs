use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::signal::{format_amount, Ratio, Signal};
use crate::diagnostic::domain::Guarantees;

const CONFORMING_COVERAGE: f64 = 1.20;
const PARTIAL_COVERAGE: f64 = 1.00;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageVerdict {
    Conforming,
    Partial,
    Insufficient,
}

impl MortgageVerdict {
    /// A coverage that cannot be computed is treated as insufficient.
    pub fn classify(coverage: Ratio) -> Self {
        if coverage.at_least(CONFORMING_COVERAGE) {
            Self::Conforming
        } else if coverage.at_least(PARTIAL_COVERAGE) {
            Self::Partial
        } else {
            Self::Insufficient
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Conforming => "Garantie Conforme",
            Self::Partial => "Garantie Partielle",
            Self::Insufficient => "Garantie Insuffisante",
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            Self::Conforming => Signal::Green,
            Self::Partial => Signal::Yellow,
            Self::Insufficient => Signal::Red,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Conforming => {
                "La couverture hypothécaire est optimale et répond aux exigences de sûreté (120%)."
            }
            Self::Partial => {
                "La garantie couvre le principal mais est inférieure au seuil de sécurité de 120%. Une garantie complémentaire ou un apport personnel plus élevé pourrait être requis."
            }
            Self::Insufficient => {
                "La valeur de l'hypothèque est inférieure au montant demandé. Le dossier présente un risque de défaut de couverture."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuaranteeAnalysis {
    Institutional {
        /// Covered share of the requested amount, in percent.
        coverage_pct: f64,
        amount: f64,
        signal: Signal,
        message: String,
    },
    Mortgage {
        asset_value: f64,
        coverage: Ratio,
        verdict: MortgageVerdict,
        label: String,
        signal: Signal,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralAnalysis {
    pub requested_amount: f64,
    pub total_coverage: f64,
    /// Total coverage over the requested amount, in percent.
    pub coverage_pct: f64,
    pub guarantees: Vec<GuaranteeAnalysis>,
    pub signal: Signal,
}

impl CollateralAnalysis {
    /// Contribution to the global score.
    pub fn points(&self) -> u32 {
        match self.signal {
            Signal::Green => 10,
            Signal::Yellow => 7,
            Signal::Orange | Signal::Red => 3,
        }
    }
}

pub fn analyze(
    requested_amount: f64,
    guarantees: &Guarantees,
    config: &ScoringConfig,
) -> CollateralAnalysis {
    let mut total_coverage = 0.0;
    let mut analyses = Vec::new();

    if guarantees.institutional {
        let amount = requested_amount * config.institutional_coverage_share;
        let coverage_pct = config.institutional_coverage_share * 100.0;
        total_coverage += amount;
        analyses.push(GuaranteeAnalysis::Institutional {
            coverage_pct,
            amount,
            signal: Signal::Green,
            message: format!(
                "Couverture à hauteur de {coverage_pct:.0}% soit {}",
                format_amount(amount)
            ),
        });
    }

    if guarantees.mortgage && guarantees.mortgaged_asset_value > 0.0 {
        let asset_value = guarantees.mortgaged_asset_value;
        let coverage =
            Ratio::divide_when(asset_value, requested_amount, requested_amount > 0.0);
        let verdict = MortgageVerdict::classify(coverage);
        total_coverage += asset_value;
        analyses.push(GuaranteeAnalysis::Mortgage {
            asset_value,
            coverage,
            verdict,
            label: verdict.label().to_string(),
            signal: verdict.signal(),
            message: verdict.message().to_string(),
        });
    }

    let coverage_pct = if requested_amount > 0.0 {
        total_coverage / requested_amount * 100.0
    } else {
        0.0
    };
    let signal = if coverage_pct >= 120.0 {
        Signal::Green
    } else if coverage_pct >= 100.0 {
        Signal::Yellow
    } else {
        Signal::Red
    };

    CollateralAnalysis {
        requested_amount,
        total_coverage,
        coverage_pct,
        guarantees: analyses,
        signal,
    }
}
