use serde::{Deserialize, Serialize};

use super::signal::{Ratio, Signal};
use crate::diagnostic::domain::FinancialStatements;

const MIN_EQUITY_RATIO: f64 = 0.20;
const MAX_REPAYMENT_YEARS: f64 = 4.0;
const MIN_PROFITABILITY: f64 = 0.0;
const MIN_LIQUIDITY: f64 = 1.0;

/// One financial indicator; `signal` is absent for informational figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub value: Ratio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub signal: Option<Signal>,
    pub message: String,
}

impl Indicator {
    fn verdict(
        value: Ratio,
        threshold: Option<f64>,
        passed: bool,
        failure: Signal,
        messages: (&str, &str),
    ) -> Self {
        let (signal, message) = if passed {
            (Signal::Green, messages.0)
        } else {
            (failure, messages.1)
        };
        Self {
            value,
            threshold,
            signal: Some(signal),
            message: message.to_string(),
        }
    }

    fn info(value: f64, message: &str) -> Self {
        Self {
            value: Ratio::Finite(value),
            threshold: None,
            signal: None,
            message: message.to_string(),
        }
    }

    pub fn is_green(&self) -> bool {
        self.signal == Some(Signal::Green)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    /// Self-financing capacity (CAF).
    pub self_financing: Indicator,
    pub net_cash: Indicator,
    /// Working-capital need (BFR).
    pub working_capital_need: Indicator,
    pub equity_ratio: Indicator,
    pub repayment_capacity: Indicator,
    pub profitability: Indicator,
    pub liquidity: Indicator,
    pub equity: Indicator,
    pub tax_debt: Indicator,
    pub net_result: Indicator,
}

impl FinancialRatios {
    /// Indicators that carry points in the global score.
    pub fn scored(&self) -> [&Indicator; 5] {
        [
            &self.equity_ratio,
            &self.repayment_capacity,
            &self.profitability,
            &self.liquidity,
            &self.equity,
        ]
    }
}

pub fn compute(statements: &FinancialStatements) -> FinancialRatios {
    let s = statements;
    let self_financing = s.net_result + s.depreciation;
    let net_cash = s.cash_assets - s.cash_liabilities;
    let working_capital_need = s.stocks + s.receivables - s.trade_payables;

    let equity_ratio = Ratio::divide_when(s.equity, s.total_assets, true);
    let repayment_capacity =
        Ratio::divide_when(s.financial_debt, self_financing, self_financing > 0.0);
    let profitability = Ratio::divide_when(s.ebitda, s.revenue, s.revenue > 0.0);
    let liquidity = Ratio::divide_when(s.current_assets, s.current_liabilities, true);

    FinancialRatios {
        self_financing: Indicator::verdict(
            Ratio::Finite(self_financing),
            None,
            self_financing >= 0.0,
            Signal::Red,
            ("Flux de trésorerie positif", "Attention: CAF négative"),
        ),
        net_cash: Indicator::verdict(
            Ratio::Finite(net_cash),
            None,
            net_cash >= 0.0,
            Signal::Orange,
            ("Trésorerie saine", "Dépendance aux découverts bancaires"),
        ),
        working_capital_need: Indicator::info(
            working_capital_need,
            "À comparer avec l'évolution du CA",
        ),
        equity_ratio: Indicator::verdict(
            equity_ratio,
            Some(MIN_EQUITY_RATIO),
            equity_ratio.at_least(MIN_EQUITY_RATIO),
            Signal::Orange,
            ("Autonomie suffisante", "Structure financière fragile"),
        ),
        repayment_capacity: Indicator::verdict(
            repayment_capacity,
            Some(MAX_REPAYMENT_YEARS),
            repayment_capacity.at_most(MAX_REPAYMENT_YEARS),
            Signal::Red,
            (
                "Capacité de remboursement correcte",
                "Surendettement potentiel",
            ),
        ),
        profitability: Indicator::verdict(
            profitability,
            Some(MIN_PROFITABILITY),
            profitability.above(MIN_PROFITABILITY),
            Signal::Red,
            ("Exploitation rentable", "Rentabilité négative"),
        ),
        liquidity: Indicator::verdict(
            liquidity,
            Some(MIN_LIQUIDITY),
            liquidity.at_least(MIN_LIQUIDITY),
            Signal::Orange,
            ("Liquidité suffisante", "Risque de liquidité"),
        ),
        equity: Indicator::verdict(
            Ratio::Finite(s.equity),
            None,
            s.equity > 0.0,
            Signal::Red,
            ("Fonds propres positifs", "ALERTE: Fonds propres négatifs"),
        ),
        tax_debt: Indicator::info(
            s.tax_debt,
            "À surveiller si augmentation avec baisse du CA",
        ),
        net_result: Indicator::verdict(
            Ratio::Finite(s.net_result),
            None,
            s.net_result >= 0.0,
            Signal::Orange,
            ("Résultat positif", "Résultat déficitaire"),
        ),
    }
}
