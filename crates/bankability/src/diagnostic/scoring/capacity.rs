use serde::{Deserialize, Serialize};

use super::signal::{Ratio, Signal};
use crate::diagnostic::domain::ReferenceContract;

pub const MAX_CAPACITY_SCORE: u32 = 20;

const FULL_MASTERY_RATIO: f64 = 0.8;
const MANAGED_CHALLENGE_RATIO: f64 = 0.4;
const SOLID_STRUCTURE_INDEX: f64 = 1.5;
const STRAINED_STRUCTURE_INDEX: f64 = 3.0;
const EXPERT_THRESHOLD: u32 = 16;
const GROWTH_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScore {
    pub points: u32,
    pub max_points: u32,
    pub label: String,
}

impl SubScore {
    fn new(points: u32, max_points: u32, label: &str) -> Self {
        Self {
            points,
            max_points,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityScores {
    pub experience: SubScore,
    pub structure: SubScore,
    pub client_history: SubScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityDiagnostic {
    pub signal: Signal,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalCapacity {
    /// Largest past contract over the current contract amount.
    pub capacity_ratio: Ratio,
    /// Current contract amount over the average past contract.
    pub capacity_index: Ratio,
    pub scores: CapacityScores,
    pub total_score: u32,
    pub max_score: u32,
    pub diagnostic: CapacityDiagnostic,
}

pub fn score_experience(capacity_ratio: Ratio) -> SubScore {
    if capacity_ratio.at_least(FULL_MASTERY_RATIO) {
        SubScore::new(7, 7, "Maîtrise totale")
    } else if capacity_ratio.at_least(MANAGED_CHALLENGE_RATIO) {
        SubScore::new(4, 7, "Challenge maîtrisé")
    } else {
        SubScore::new(1, 7, "Saut d'échelle risqué")
    }
}

/// An unknown index (no past volume at all) scores as the riskiest structure.
pub fn score_structure(capacity_index: Ratio) -> SubScore {
    if capacity_index.at_most(SOLID_STRUCTURE_INDEX) {
        SubScore::new(7, 7, "Structure solide")
    } else if capacity_index.at_most(STRAINED_STRUCTURE_INDEX) {
        SubScore::new(4, 7, "Tension sur les ressources")
    } else {
        SubScore::new(0, 7, "Risque de faillite opérationnelle")
    }
}

pub fn score_client_history(references: &[ReferenceContract]) -> SubScore {
    if references.is_empty() {
        return SubScore::new(0, 6, "Aucune référence");
    }

    let institutional = references.iter().any(|reference| {
        reference
            .client_type
            .map(|client| client.is_institutional())
            .unwrap_or(false)
    });

    if institutional {
        SubScore::new(6, 6, "Clients publics / Grands comptes")
    } else {
        SubScore::new(1, 6, "Clients privés / Particuliers uniquement")
    }
}

fn diagnose(total: u32) -> CapacityDiagnostic {
    let (signal, label, message) = if total >= EXPERT_THRESHOLD {
        (
            Signal::Green,
            "Profil Expert",
            "Favorable. Capacité technique démontrée.",
        )
    } else if total >= GROWTH_THRESHOLD {
        (
            Signal::Yellow,
            "Profil en Croissance",
            "Vigilance. Capacité à surveiller.",
        )
    } else {
        (
            Signal::Red,
            "Profil Fragile",
            "Alerte. Capacité insuffisante pour ce marché.",
        )
    };

    CapacityDiagnostic {
        signal,
        label: label.to_string(),
        message: message.to_string(),
    }
}

pub fn analyze(
    references: &[ReferenceContract],
    contract_amount: f64,
    annual_revenue: f64,
) -> TechnicalCapacity {
    let amounts: Vec<f64> = references
        .iter()
        .map(|reference| reference.amount)
        .filter(|amount| *amount > 0.0)
        .collect();

    let largest = amounts.iter().copied().fold(0.0_f64, f64::max);
    let average = if amounts.is_empty() {
        annual_revenue
    } else {
        amounts.iter().sum::<f64>() / amounts.len() as f64
    };

    let capacity_ratio = Ratio::divide_when(largest, contract_amount, contract_amount > 0.0);
    let capacity_index = Ratio::divide_when(contract_amount, average, average != 0.0);

    let scores = CapacityScores {
        experience: score_experience(capacity_ratio),
        structure: score_structure(capacity_index),
        client_history: score_client_history(references),
    };
    let total_score =
        scores.experience.points + scores.structure.points + scores.client_history.points;

    TechnicalCapacity {
        capacity_ratio,
        capacity_index,
        scores,
        total_score,
        max_score: MAX_CAPACITY_SCORE,
        diagnostic: diagnose(total_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::domain::ReferenceClientType;

    fn reference(amount: f64, client: Option<ReferenceClientType>) -> ReferenceContract {
        ReferenceContract {
            title: Some("Réhabilitation école".to_string()),
            amount,
            client_type: client,
            year: Some("2023".to_string()),
        }
    }

    #[test]
    fn experience_thresholds() {
        assert_eq!(score_experience(Ratio::Finite(0.8)).points, 7);
        assert_eq!(score_experience(Ratio::Finite(0.79)).points, 4);
        assert_eq!(score_experience(Ratio::Finite(0.4)).points, 4);
        assert_eq!(score_experience(Ratio::Finite(0.39)).points, 1);
        assert_eq!(score_experience(Ratio::NotApplicable).points, 1);
    }

    #[test]
    fn structure_thresholds() {
        assert_eq!(score_structure(Ratio::Finite(1.5)).points, 7);
        assert_eq!(score_structure(Ratio::Finite(3.0)).points, 4);
        assert_eq!(score_structure(Ratio::Finite(3.01)).points, 0);
        assert_eq!(score_structure(Ratio::NotApplicable).points, 0);
    }

    #[test]
    fn expert_profile_scores_twenty() {
        let references = vec![
            reference(100.0, Some(ReferenceClientType::Public)),
            reference(80.0, Some(ReferenceClientType::Private)),
        ];

        let capacity = analyze(&references, 100.0, 0.0);

        assert_eq!(capacity.capacity_ratio, Ratio::Finite(1.0));
        assert_eq!(capacity.total_score, 20);
        assert_eq!(capacity.diagnostic.signal, Signal::Green);
    }

    #[test]
    fn falls_back_to_annual_revenue_without_references() {
        let capacity = analyze(&[], 200.0, 100.0);

        assert_eq!(capacity.capacity_index, Ratio::Finite(2.0));
        assert_eq!(capacity.scores.experience.points, 1);
        assert_eq!(capacity.scores.structure.points, 4);
        assert_eq!(capacity.scores.client_history.points, 0);
        assert_eq!(capacity.total_score, 5);
        assert_eq!(capacity.diagnostic.label, "Profil Fragile");
    }

    #[test]
    fn zero_average_makes_index_not_applicable() {
        let capacity = analyze(&[], 200.0, 0.0);
        assert_eq!(capacity.capacity_index, Ratio::NotApplicable);
        assert_eq!(capacity.scores.structure.points, 0);
    }

    #[test]
    fn private_only_history_scores_one() {
        let references = vec![reference(0.0, Some(ReferenceClientType::Individual))];
        let capacity = analyze(&references, 100.0, 50.0);
        assert_eq!(capacity.scores.client_history.points, 1);
        // no positive amounts, so the average falls back to annual revenue
        assert_eq!(capacity.capacity_index, Ratio::Finite(2.0));
    }

    #[test]
    fn total_is_sum_of_sub_scores_and_bounded() {
        for contract in [0.0, 10.0, 100.0, 1_000.0, 1e9] {
            for revenue in [0.0, 50.0, 1e6] {
                let references = vec![reference(120.0, Some(ReferenceClientType::LargeGroup))];
                let capacity = analyze(&references, contract, revenue);
                let sum = capacity.scores.experience.points
                    + capacity.scores.structure.points
                    + capacity.scores.client_history.points;
                assert_eq!(capacity.total_score, sum);
                assert!(capacity.total_score <= MAX_CAPACITY_SCORE);
            }
        }
    }
}
