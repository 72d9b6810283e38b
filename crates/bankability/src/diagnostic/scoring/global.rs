use serde::{Deserialize, Serialize};

use super::capacity::TechnicalCapacity;
use super::client::ClientQuality;
use super::collateral::CollateralAnalysis;
use super::debt::BankDebt;
use super::delay::DelayAnalysis;
use super::margin::MarginAnalysis;
use super::ratios::FinancialRatios;
use super::signal::Signal;

pub const MAX_SCORE: u32 = 100;

const RATIO_POINTS: u32 = 4;
const FAVORABLE_PCT: f64 = 70.0;
const IMPROVABLE_PCT: f64 = 50.0;

/// Final verdict tier for the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticTier {
    Favorable,
    Improvable,
    Weak,
    /// Critical alerts override the computed percentage.
    Blocked,
}

impl DiagnosticTier {
    pub fn signal(&self) -> Signal {
        match self {
            Self::Favorable => Signal::Green,
            Self::Improvable => Signal::Orange,
            Self::Weak | Self::Blocked => Signal::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Favorable => "FEU VERT",
            Self::Improvable => "FEU ORANGE",
            Self::Weak | Self::Blocked => "FEU ROUGE",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Favorable => "green",
            Self::Improvable => "orange",
            Self::Weak | Self::Blocked => "red",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Favorable => {
                "Votre dossier présente un profil favorable pour une demande d'avance sur marché."
            }
            Self::Improvable => {
                "Votre dossier présente des points à améliorer avant de solliciter un financement."
            }
            Self::Weak => {
                "Votre dossier présente des faiblesses significatives qui pourraient compromettre l'obtention du financement."
            }
            Self::Blocked => {
                "Dossier avec alertes critiques. Accompagnement fortement recommandé avant toute démarche bancaire."
            }
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Favorable => {
                "Vous pouvez déposer votre dossier en banque. Un accompagnement IOB peut optimiser vos conditions."
            }
            Self::Improvable => {
                "Un accompagnement personnalisé vous permettrait d'optimiser votre dossier."
            }
            Self::Weak => "Un diagnostic approfondi par un expert IOB est fortement recommandé.",
            Self::Blocked => {
                "Prendre rendez-vous avec un conseiller IOB pour analyser les points bloquants."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalDiagnostic {
    pub tier: DiagnosticTier,
    pub signal: Signal,
    pub label: String,
    pub color: String,
    pub message: String,
    pub recommendation: String,
}

impl From<DiagnosticTier> for FinalDiagnostic {
    fn from(tier: DiagnosticTier) -> Self {
        Self {
            tier,
            signal: tier.signal(),
            label: tier.label().to_string(),
            color: tier.color().to_string(),
            message: tier.message().to_string(),
            recommendation: tier.recommendation().to_string(),
        }
    }
}

/// Points earned per dimension, kept for audit alongside the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub delay: u32,
    pub client: u32,
    pub technical_capacity: u32,
    pub margin: u32,
    pub financial_ratios: u32,
    pub bank_debt: u32,
    pub collateral: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.delay
            + self.client
            + self.technical_capacity
            + self.margin
            + self.financial_ratios
            + self.bank_debt
            + self.collateral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalScore {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub breakdown: ScoreBreakdown,
    pub diagnostic: FinalDiagnostic,
    pub critical_alerts: Vec<String>,
}

/// Borrowed view of the scored analyzer results.
pub struct ScoredDimensions<'a> {
    pub delay: Option<&'a DelayAnalysis>,
    pub client: &'a ClientQuality,
    pub technical_capacity: &'a TechnicalCapacity,
    pub margin: &'a MarginAnalysis,
    pub financial_ratios: &'a FinancialRatios,
    pub bank_debt: &'a BankDebt,
    pub collateral: &'a CollateralAnalysis,
}

pub fn tier_for(percentage: f64, has_critical_alerts: bool) -> DiagnosticTier {
    if has_critical_alerts {
        DiagnosticTier::Blocked
    } else if percentage >= FAVORABLE_PCT {
        DiagnosticTier::Favorable
    } else if percentage >= IMPROVABLE_PCT {
        DiagnosticTier::Improvable
    } else {
        DiagnosticTier::Weak
    }
}

pub fn aggregate(dimensions: &ScoredDimensions<'_>) -> GlobalScore {
    let green_ratios = dimensions
        .financial_ratios
        .scored()
        .iter()
        .filter(|indicator| indicator.is_green())
        .count() as u32;

    let breakdown = ScoreBreakdown {
        delay: dimensions.delay.map(|delay| delay.points).unwrap_or(0),
        client: dimensions.client.score,
        technical_capacity: dimensions.technical_capacity.total_score,
        margin: dimensions.margin.tier.points(),
        financial_ratios: green_ratios * RATIO_POINTS,
        bank_debt: dimensions.bank_debt.points(),
        collateral: dimensions.collateral.points(),
    };

    let mut critical_alerts = Vec::new();
    if dimensions.bank_debt.has_unpaid() {
        critical_alerts.push("Présence d'impayés bancaires".to_string());
    }

    let total_score = breakdown.total();
    let percentage = total_score as f64 / MAX_SCORE as f64 * 100.0;
    let tier = tier_for(percentage, !critical_alerts.is_empty());

    GlobalScore {
        total_score,
        max_score: MAX_SCORE,
        percentage,
        breakdown,
        diagnostic: tier.into(),
        critical_alerts,
    }
}
