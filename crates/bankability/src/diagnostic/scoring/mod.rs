pub mod amount;
pub mod capacity;
pub mod client;
pub mod collateral;
mod config;
pub mod debt;
pub mod delay;
pub mod domiciliation;
pub mod global;
pub mod margin;
pub mod ratios;
pub mod signal;
pub mod trend;

pub use config::ScoringConfig;
pub use global::{DiagnosticTier, FinalDiagnostic, GlobalScore, ScoreBreakdown};
pub use signal::{format_amount, Alert, AlertLevel, Ratio, Signal};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::LoanApplication;
use super::form::FormValues;
use amount::AmountCoherence;
use capacity::TechnicalCapacity;
use client::ClientQuality;
use collateral::CollateralAnalysis;
use debt::BankDebt;
use delay::DelayAnalysis;
use domiciliation::Domiciliation;
use global::ScoredDimensions;
use margin::MarginAnalysis;
use ratios::FinancialRatios;
use trend::RevenueTrend;

/// Stateless engine applying every analyzer and the aggregator to one application.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Parse the raw form leniently, then score it.
    pub fn analyze_form(&self, form: &FormValues, today: NaiveDate) -> Analysis {
        self.analyze(&LoanApplication::from_form(form), today)
    }

    pub fn analyze(&self, application: &LoanApplication, today: NaiveDate) -> Analysis {
        let contract = &application.contract;

        let delay = delay::analyze(
            contract.order_of_service_date,
            contract.planned_end_date,
            today,
        );
        let amount_coherence = amount::check(contract, &self.config);
        let client = client::analyze(application.authority, application.funding_source);
        let technical_capacity = capacity::analyze(
            &application.references,
            contract.amount,
            application.annual_revenue,
        );
        let margin = margin::analyze(application.sector, contract.amount, &application.charges);
        let financial_ratios = ratios::compute(&application.statements);
        let revenue_trend = trend::analyze(&application.revenue_history);
        let bank_debt = debt::analyze(&application.bank, application.statements.financial_debt);
        let collateral = collateral::analyze(
            contract.requested_amount,
            &application.guarantees,
            &self.config,
        );
        let domiciliation = domiciliation::check(application.bank_details_match);

        let global_score = global::aggregate(&ScoredDimensions {
            delay: delay.as_ref(),
            client: &client,
            technical_capacity: &technical_capacity,
            margin: &margin,
            financial_ratios: &financial_ratios,
            bank_debt: &bank_debt,
            collateral: &collateral,
        });

        Analysis {
            delay,
            amount_coherence,
            client,
            technical_capacity,
            margin,
            financial_ratios,
            revenue_trend,
            bank_debt,
            collateral,
            domiciliation,
            global_score,
        }
    }
}

/// Complete diagnostic for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Absent when the contract dates were not provided.
    pub delay: Option<DelayAnalysis>,
    pub amount_coherence: AmountCoherence,
    pub client: ClientQuality,
    pub technical_capacity: TechnicalCapacity,
    pub margin: MarginAnalysis,
    pub financial_ratios: FinancialRatios,
    pub revenue_trend: RevenueTrend,
    pub bank_debt: BankDebt,
    pub collateral: CollateralAnalysis,
    pub domiciliation: Domiciliation,
    pub global_score: GlobalScore,
}
