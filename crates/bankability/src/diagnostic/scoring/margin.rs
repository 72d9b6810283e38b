use serde::{Deserialize, Serialize};

use super::signal::{Alert, Signal};
use crate::diagnostic::domain::{ContractCharges, Sector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTier {
    Comfortable,
    Limited,
    Thin,
    Negative,
}

impl MarginTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 20.0 {
            Self::Comfortable
        } else if rate >= 10.0 {
            Self::Limited
        } else if rate >= 0.0 {
            Self::Thin
        } else {
            Self::Negative
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            Self::Comfortable => Signal::Green,
            Self::Limited => Signal::Yellow,
            Self::Thin => Signal::Orange,
            Self::Negative => Signal::Red,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Comfortable => "Marge confortable",
            Self::Limited => "Marge acceptable mais limitée",
            Self::Thin => "Marge très faible, risque élevé",
            Self::Negative => "Marge négative - Opération déficitaire !",
        }
    }

    /// Contribution to the global score.
    pub fn points(&self) -> u32 {
        match self {
            Self::Comfortable => 15,
            Self::Limited => 10,
            Self::Thin => 5,
            Self::Negative => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginAnalysis {
    pub margin: f64,
    /// Margin as a percentage of the contract amount; 0 for a non-positive contract.
    pub margin_rate: f64,
    pub total_charges: f64,
    pub tier: MarginTier,
    pub signal: Signal,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_alert: Option<Alert>,
}

pub fn compute(contract_amount: f64, charges: &ContractCharges) -> MarginAnalysis {
    let total_charges = charges.purchases + charges.labor + charges.taxes;
    let margin = contract_amount - total_charges;
    let margin_rate = if contract_amount > 0.0 {
        margin / contract_amount * 100.0
    } else {
        0.0
    };
    let tier = MarginTier::from_rate(margin_rate);

    MarginAnalysis {
        margin,
        margin_rate,
        total_charges,
        tier,
        signal: tier.signal(),
        message: tier.message().to_string(),
        structure_alert: None,
    }
}

/// Construction files are expected to spend more on materials than on labor.
pub fn charge_structure_alert(sector: Sector, charges: &ContractCharges) -> Option<Alert> {
    if sector == Sector::Construction && charges.purchases < charges.labor {
        return Some(Alert::warning(
            "Pour un marché BTP, les achats de matériaux devraient normalement être supérieurs aux dépenses de main d'œuvre.",
        ));
    }
    None
}

pub fn analyze(sector: Sector, contract_amount: f64, charges: &ContractCharges) -> MarginAnalysis {
    let mut analysis = compute(contract_amount, charges);
    analysis.structure_alert = charge_structure_alert(sector, charges);
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charges(purchases: f64, labor: f64, taxes: f64) -> ContractCharges {
        ContractCharges {
            purchases,
            labor,
            taxes,
        }
    }

    #[test]
    fn twenty_percent_margin_is_green() {
        let analysis = compute(100.0, &charges(40.0, 30.0, 10.0));
        assert_eq!(analysis.total_charges, 80.0);
        assert_eq!(analysis.margin, 20.0);
        assert_eq!(analysis.margin_rate, 20.0);
        assert_eq!(analysis.signal, Signal::Green);
        assert_eq!(analysis.tier.points(), 15);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(MarginTier::from_rate(19.99), MarginTier::Limited);
        assert_eq!(MarginTier::from_rate(10.0), MarginTier::Limited);
        assert_eq!(MarginTier::from_rate(0.0), MarginTier::Thin);
        assert_eq!(MarginTier::from_rate(-0.01), MarginTier::Negative);
    }

    #[test]
    fn zero_contract_reports_zero_rate() {
        let analysis = compute(0.0, &charges(10.0, 0.0, 0.0));
        assert_eq!(analysis.margin, -10.0);
        assert_eq!(analysis.margin_rate, 0.0);
        assert_eq!(analysis.tier, MarginTier::Thin);
    }

    #[test]
    fn construction_with_labor_heavy_charges_warns() {
        let analysis = analyze(Sector::Construction, 100.0, &charges(20.0, 40.0, 5.0));
        assert!(analysis.structure_alert.is_some());

        let other = analyze(Sector::Other, 100.0, &charges(20.0, 40.0, 5.0));
        assert!(other.structure_alert.is_none());

        let balanced = analyze(Sector::Construction, 100.0, &charges(40.0, 40.0, 5.0));
        assert!(balanced.structure_alert.is_none());
    }
}
