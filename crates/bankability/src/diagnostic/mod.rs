//! Bankability diagnostic for construction-market cash-advance requests.
//!
//! Raw form values are parsed leniently into a [`LoanApplication`], scored by the
//! [`ScoringEngine`] analyzers and aggregated into a single weighted verdict. The
//! [`DiagnosticService`] wraps the engine with submission checks and hands every
//! scored result to a [`SubmissionNotifier`].

pub mod domain;
pub mod form;
pub mod notifier;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BankPosition, ContractCharges, ContractTerms, ContractingAuthority, FinancialStatements,
    FundingSource, Guarantees, LoanApplication, ReferenceClientType, ReferenceContract,
    RevenueHistory, Sector,
};
pub use form::{FieldValue, FormValues};
pub use notifier::{
    DisabledNotifier, NotificationError, SubmissionNotifier, SubmissionPayload, WebhookNotifier,
};
pub use router::diagnostic_router;
pub use scoring::{Analysis, GlobalScore, ScoringConfig, ScoringEngine, Signal};
pub use service::{DiagnosticService, SubmissionError, SubmissionPolicy};
