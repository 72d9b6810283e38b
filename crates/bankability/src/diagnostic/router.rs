use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::form::FormValues;
use super::notifier::SubmissionNotifier;
use super::service::{DiagnosticService, SubmissionError};

#[derive(Debug, Default, Deserialize)]
pub struct DiagnosticQuery {
    /// Evaluation date override (YYYY-MM-DD); defaults to today.
    #[serde(default)]
    pub today: Option<String>,
}

/// Router builder exposing the diagnostic submission endpoint.
pub fn diagnostic_router<N>(service: Arc<DiagnosticService<N>>) -> Router
where
    N: SubmissionNotifier + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/diagnostics", post(submit_handler::<N>))
        .with_state(service)
}

pub(crate) async fn submit_handler<N>(
    State(service): State<Arc<DiagnosticService<N>>>,
    Query(query): Query<DiagnosticQuery>,
    axum::Json(form): axum::Json<FormValues>,
) -> Response
where
    N: SubmissionNotifier + ?Sized + 'static,
{
    let today = match query.today.as_deref() {
        Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(err) => {
                let payload = json!({
                    "error": format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => Local::now().date_naive(),
    };

    match service.submit(form, today).await {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(SubmissionError::MissingFields(fields)) => {
            let payload = json!({
                "error": "missing required fields",
                "missing_fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ SubmissionError::ConsentRequired) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
