use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::info;

use super::form::FormValues;
use super::notifier::{SubmissionNotifier, SubmissionPayload};
use super::scoring::{Analysis, ScoringEngine};
use crate::config::DiagnosticConfig;

/// Fields the intake form marks as required.
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &[
    "montantHT",
    "montantDemande",
    "dateSignatureOS",
    "dateFinPrevue",
    "typeMaitreOuvrage",
];

pub const CONSENT_FIELD: &str = "consent";

/// Gatekeeping and pacing rules applied around the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPolicy {
    pub required_fields: Vec<String>,
    pub require_consent: bool,
    pub presentation_delay: Duration,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self::from_config(&DiagnosticConfig::default())
    }
}

impl SubmissionPolicy {
    pub fn from_config(config: &DiagnosticConfig) -> Self {
        Self {
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            require_consent: config.require_consent,
            presentation_delay: config.presentation_delay,
        }
    }
}

/// Service composing validation, scoring and the outbound notification.
pub struct DiagnosticService<N: ?Sized> {
    engine: ScoringEngine,
    notifier: Arc<N>,
    policy: SubmissionPolicy,
}

impl<N> DiagnosticService<N>
where
    N: SubmissionNotifier + ?Sized + 'static,
{
    pub fn new(engine: ScoringEngine, notifier: Arc<N>, policy: SubmissionPolicy) -> Self {
        Self {
            engine,
            notifier,
            policy,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn policy(&self) -> &SubmissionPolicy {
        &self.policy
    }

    /// Check required fields and consent without scoring.
    pub fn validate(&self, form: &FormValues) -> Result<(), SubmissionError> {
        let missing: Vec<String> = self
            .policy
            .required_fields
            .iter()
            .filter(|field| !form.is_present(field))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }

        if self.policy.require_consent && !form.checked(CONSENT_FIELD) {
            return Err(SubmissionError::ConsentRequired);
        }

        Ok(())
    }

    /// Validate, score, notify in the background, then pace the response.
    pub async fn submit(
        &self,
        form: FormValues,
        today: NaiveDate,
    ) -> Result<Analysis, SubmissionError> {
        self.validate(&form)?;

        let analysis = self.engine.analyze_form(&form, today);
        let score = &analysis.global_score;
        info!(
            total_score = score.total_score,
            percentage = score.percentage,
            verdict = score.diagnostic.label.as_str(),
            critical_alerts = score.critical_alerts.len(),
            "diagnostic computed"
        );

        self.notifier
            .notify(SubmissionPayload::new(form, analysis.clone()));

        if !self.policy.presentation_delay.is_zero() {
            tokio::time::sleep(self.policy.presentation_delay).await;
        }

        Ok(analysis)
    }
}

/// Error raised when a submission is rejected before scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("consent to the processing conditions is required")]
    ConsentRequired,
}
