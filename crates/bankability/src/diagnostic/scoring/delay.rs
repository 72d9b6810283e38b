use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::signal::Signal;

const START_PHASE_MAX: f64 = 0.20;
const CRUISE_PHASE_MAX: f64 = 0.60;
const CLOSING_PHASE_MAX: f64 = 0.90;

/// Share of the contractual duration already consumed at `today`.
///
/// Never negative; a non-positive contractual duration reports 1 so the contract is
/// treated as overdue.
pub fn consumption_ratio(start: NaiveDate, planned_end: NaiveDate, today: NaiveDate) -> f64 {
    let total = (planned_end - start).num_days();
    if total <= 0 {
        return 1.0;
    }
    let consumed = (today - start).num_days();
    (consumed as f64 / total as f64).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayPhase {
    Start,
    Cruise,
    Closing,
    Overdue,
}

impl DelayPhase {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio <= START_PHASE_MAX {
            Self::Start
        } else if ratio <= CRUISE_PHASE_MAX {
            Self::Cruise
        } else if ratio <= CLOSING_PHASE_MAX {
            Self::Closing
        } else {
            Self::Overdue
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Start => "Démarrage",
            Self::Cruise => "Phase de croisière",
            Self::Closing => "Fin de chantier",
            Self::Overdue => "Hors délai",
        }
    }

    pub fn risk(&self) -> &'static str {
        match self {
            Self::Start => "Faible",
            Self::Cruise => "Modéré",
            Self::Closing => "Élevé",
            Self::Overdue => "Critique",
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            Self::Start => Signal::Green,
            Self::Cruise => Signal::Yellow,
            Self::Closing => Signal::Orange,
            Self::Overdue => Signal::Red,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Self::Start => 10,
            Self::Cruise => 7,
            Self::Closing => 3,
            Self::Overdue => 0,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Start => "Idéal pour une avance de démarrage.",
            Self::Cruise => {
                "L'avance doit être justifiée par des besoins de trésorerie spécifiques."
            }
            Self::Closing => "Risque que l'avance serve à payer des dettes antérieures.",
            Self::Overdue => "Alerte : Marché en retard, risque de pénalités.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayAnalysis {
    pub ratio: f64,
    pub phase: DelayPhase,
    pub category: String,
    pub risk: String,
    pub signal: Signal,
    pub message: String,
    pub points: u32,
}

impl DelayAnalysis {
    pub fn from_ratio(ratio: f64) -> Self {
        let phase = DelayPhase::from_ratio(ratio);
        Self {
            ratio,
            phase,
            category: phase.category().to_string(),
            risk: phase.risk().to_string(),
            signal: phase.signal(),
            message: phase.message().to_string(),
            points: phase.points(),
        }
    }
}

/// Analyze delay consumption; `None` when either contract date is unknown.
pub fn analyze(
    start: Option<NaiveDate>,
    planned_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<DelayAnalysis> {
    let ratio = consumption_ratio(start?, planned_end?, today);
    Some(DelayAnalysis::from_ratio(ratio))
}
