use serde::{Deserialize, Serialize};

use super::signal::{format_amount, Alert, Signal};
use crate::diagnostic::domain::BankPosition;

const DECLARED_GAP_TOLERANCE: f64 = 0.20;
const SIGNATURE_TO_CREDIT_LIMIT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDebt {
    pub direct_credit: f64,
    pub signature_commitments: f64,
    pub authorized_lines: f64,
    pub unpaid: f64,
    /// Percentage of authorized lines drawn; absent when no ceiling was declared.
    pub utilization_rate: Option<f64>,
    pub signal: Signal,
    pub alerts: Vec<Alert>,
}

impl BankDebt {
    pub fn has_unpaid(&self) -> bool {
        self.unpaid > 0.0
    }

    /// Contribution to the global score.
    pub fn points(&self) -> u32 {
        match self.signal {
            Signal::Green => 15,
            Signal::Yellow => 10,
            Signal::Orange => 5,
            Signal::Red => 0,
        }
    }
}

pub fn analyze(bank: &BankPosition, balance_sheet_debt: f64) -> BankDebt {
    let mut signal = Signal::Green;
    let mut alerts = Vec::new();

    if bank.unpaid > 0.0 {
        signal = signal.escalate(Signal::Red);
        alerts.push(Alert::danger(format!(
            "ALERTE CRITIQUE: Impayés détectés ({}). Dossier à risque élevé.",
            format_amount(bank.unpaid)
        )));
    }

    if balance_sheet_debt > 0.0 {
        let gap = (bank.direct_credit - balance_sheet_debt).abs() / balance_sheet_debt;
        if gap > DECLARED_GAP_TOLERANCE {
            signal = signal.escalate(Signal::Orange);
            alerts.push(Alert::warning(
                "Écart significatif entre engagements déclarés et bilan (> 20%). Justification recommandée.",
            ));
        }
    }

    if bank.signature_commitments > bank.direct_credit * SIGNATURE_TO_CREDIT_LIMIT {
        signal = signal.escalate(Signal::Yellow);
        alerts.push(Alert::warning(
            "Cautions très élevées par rapport aux crédits directs. Vérifier la capacité technique.",
        ));
    }

    let utilization_rate = (bank.authorized_lines > 0.0)
        .then(|| bank.direct_credit / bank.authorized_lines * 100.0);

    BankDebt {
        direct_credit: bank.direct_credit,
        signature_commitments: bank.signature_commitments,
        authorized_lines: bank.authorized_lines,
        unpaid: bank.unpaid,
        utilization_rate,
        signal,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::scoring::signal::AlertLevel;

    fn position(direct: f64, signature: f64, lines: f64, unpaid: f64) -> BankPosition {
        BankPosition {
            direct_credit: direct,
            signature_commitments: signature,
            authorized_lines: lines,
            unpaid,
        }
    }

    #[test]
    fn clean_position_is_green() {
        let debt = analyze(&position(100.0, 150.0, 200.0, 0.0), 100.0);
        assert_eq!(debt.signal, Signal::Green);
        assert!(debt.alerts.is_empty());
        assert_eq!(debt.utilization_rate, Some(50.0));
        assert_eq!(debt.points(), 15);
    }

    #[test]
    fn unpaid_amounts_are_critical() {
        let debt = analyze(&position(100.0, 0.0, 0.0, 1.0), 100.0);
        assert_eq!(debt.signal, Signal::Red);
        assert!(debt.has_unpaid());
        assert_eq!(debt.alerts[0].level, AlertLevel::Danger);
        assert_eq!(debt.utilization_rate, None);
    }

    #[test]
    fn declared_gap_escalates_to_orange() {
        let debt = analyze(&position(70.0, 0.0, 0.0, 0.0), 100.0);
        assert_eq!(debt.signal, Signal::Orange);

        let within = analyze(&position(80.0, 0.0, 0.0, 0.0), 100.0);
        assert_eq!(within.signal, Signal::Green);
    }

    #[test]
    fn heavy_signature_commitments_escalate_to_yellow_only_from_green() {
        let yellow = analyze(&position(100.0, 201.0, 0.0, 0.0), 100.0);
        assert_eq!(yellow.signal, Signal::Yellow);

        let orange = analyze(&position(50.0, 500.0, 0.0, 0.0), 100.0);
        assert_eq!(orange.signal, Signal::Orange);
        assert_eq!(orange.alerts.len(), 2);

        let red = analyze(&position(50.0, 500.0, 0.0, 10.0), 100.0);
        assert_eq!(red.signal, Signal::Red);
        assert_eq!(red.alerts.len(), 3);
    }
}
