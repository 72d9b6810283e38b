use serde::{Deserialize, Serialize};

use super::signal::Signal;
use crate::diagnostic::domain::RevenueHistory;

const SEVERE_DECLINE_PCT: f64 = -20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendPattern {
    #[serde(rename = "CROISSANCE_CONTINUE")]
    ContinuousGrowth,
    #[serde(rename = "REPRISE")]
    Recovery,
    #[serde(rename = "INSTABILITE")]
    Instability,
    #[serde(rename = "CHUTE_CONTINUE")]
    ContinuousDecline,
    #[serde(rename = "INCOMPLET")]
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueTrend {
    pub pattern: TrendPattern,
    /// Absent when the history is incomplete.
    pub signal: Option<Signal>,
    pub message: String,
    /// `[N vs N-1, N-1 vs N-2]` in percent; empty when the history is incomplete.
    pub variations: Vec<f64>,
}

fn variation(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

pub fn analyze(history: &RevenueHistory) -> RevenueTrend {
    let (previous, two_years_ago) = match (history.previous, history.two_years_ago) {
        (Some(previous), Some(two_years_ago)) if previous != 0.0 && two_years_ago != 0.0 => {
            (previous, two_years_ago)
        }
        _ => {
            return RevenueTrend {
                pattern: TrendPattern::Incomplete,
                signal: None,
                message: "Données insuffisantes pour l'analyse d'évolution".to_string(),
                variations: Vec::new(),
            }
        }
    };

    let recent = variation(previous, history.current);
    let prior = variation(two_years_ago, previous);

    let (pattern, signal, message) = match (recent >= 0.0, prior >= 0.0) {
        (true, true) => (
            TrendPattern::ContinuousGrowth,
            Signal::Green,
            "Croissance continue favorable",
        ),
        (true, false) => (
            TrendPattern::Recovery,
            Signal::Yellow,
            "Chute puis reprise - Acceptable",
        ),
        (false, true) => (
            TrendPattern::Instability,
            Signal::Orange,
            "Reprise puis rechute - Instabilité",
        ),
        (false, false) => {
            if variation(two_years_ago, history.current) < SEVERE_DECLINE_PCT {
                (
                    TrendPattern::ContinuousDecline,
                    Signal::Red,
                    "Chute continue > 20% - Déséquilibre financier élevé",
                )
            } else {
                (
                    TrendPattern::ContinuousDecline,
                    Signal::Orange,
                    "Tendance baissière à surveiller",
                )
            }
        }
    };

    RevenueTrend {
        pattern,
        signal: Some(signal),
        message: message.to_string(),
        variations: vec![recent, prior],
    }
}
