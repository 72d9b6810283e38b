use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::form::FormValues;
use super::scoring::{Analysis, GlobalScore};

/// Snapshot forwarded to the external endpoint after each scored submission.
///
/// Top-level keys keep the names existing webhook consumers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "formData")]
    pub form_data: FormValues,
    #[serde(rename = "analyses")]
    pub analysis: Analysis,
    #[serde(rename = "scoreGlobal")]
    pub global_score: GlobalScore,
}

impl SubmissionPayload {
    pub fn new(form_data: FormValues, analysis: Analysis) -> Self {
        let global_score = analysis.global_score.clone();
        Self {
            timestamp: Utc::now(),
            form_data,
            analysis,
            global_score,
        }
    }
}

/// Outbound hook for scored submissions. Implementations must not block the caller
/// and must never surface delivery failures.
pub trait SubmissionNotifier: Send + Sync {
    fn notify(&self, payload: SubmissionPayload);
}

/// Notifier used when no endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl SubmissionNotifier for DisabledNotifier {
    fn notify(&self, payload: SubmissionPayload) {
        debug!(
            total_score = payload.global_score.total_score,
            "no webhook configured; skipping submission notification"
        );
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("webhook transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with status {0}")]
    Status(u16),
}

/// Fire-and-forget JSON POST to a configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one payload and wait for the response. No retries.
    pub async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), NotificationError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl SubmissionNotifier for WebhookNotifier {
    fn notify(&self, payload: SubmissionPayload) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(url = %self.url, "no async runtime available; webhook notification dropped");
                return;
            }
        };

        let notifier = self.clone();
        handle.spawn(async move {
            match notifier.deliver(&payload).await {
                Ok(()) => debug!(url = %notifier.url, "webhook notification delivered"),
                Err(err) => warn!(url = %notifier.url, error = %err, "webhook notification failed"),
            }
        });
    }
}

/// Build the notifier described by the configuration.
pub fn from_config(
    url: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn SubmissionNotifier>, NotificationError> {
    match url {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(url, timeout)?)),
        None => Ok(Arc::new(DisabledNotifier)),
    }
}
