use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::signal::{format_amount, Alert};
use crate::diagnostic::domain::ContractTerms;

/// Advisory check that the requested credit fits under the contract ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountCoherence {
    pub coherent: bool,
    pub alerts: Vec<Alert>,
    pub forecast_advance: f64,
    pub max_credit: f64,
}

pub fn check(contract: &ContractTerms, config: &ScoringConfig) -> AmountCoherence {
    let forecast_advance = contract
        .start_advance_rate
        .map(|rate| contract.amount * rate / 100.0)
        .unwrap_or(0.0);
    let max_credit = contract.amount * config.max_credit_share;
    let ceiling_pct = (config.max_credit_share * 100.0).round();

    let mut alerts = Vec::new();
    if contract.receives_start_advance && forecast_advance > 0.0 {
        let ceiling = max_credit - forecast_advance;
        if contract.requested_amount > ceiling {
            alerts.push(Alert::danger(format!(
                "Avec l'avance de démarrage de {}, le crédit ne peut pas dépasser {} ({ceiling_pct}% du montant HT - avance).",
                format_amount(forecast_advance),
                format_amount(ceiling)
            )));
        }
    } else if contract.requested_amount > max_credit {
        alerts.push(Alert::danger(format!(
            "Le montant demandé dépasse {ceiling_pct}% du montant HT du marché (max: {}).",
            format_amount(max_credit)
        )));
    }

    AmountCoherence {
        coherent: alerts.is_empty(),
        alerts,
        forecast_advance,
        max_credit,
    }
}
