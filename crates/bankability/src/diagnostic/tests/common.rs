use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

use crate::diagnostic::form::FormValues;
use crate::diagnostic::notifier::{SubmissionNotifier, SubmissionPayload};
use crate::diagnostic::scoring::ScoringEngine;
use crate::diagnostic::service::{DiagnosticService, SubmissionPolicy};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 5).expect("valid date")
}

/// Application earning the maximum in every scored dimension.
pub(super) fn ideal_form() -> FormValues {
    FormValues::new()
        .with("dateSignatureOS", "2025-01-01")
        .with("dateFinPrevue", "2025-12-31")
        .with("montantHT", "100000000")
        .with("montantDemande", "60000000")
        .with("recevoirAvance", "non")
        .with("typeMaitreOuvrage", "etat")
        .with("sourceFinancement", "budget_national")
        .with("secteurActivite", "btp")
        .with("caAnnuel", "1000000000")
        .with("ref1_intitule", "Bitumage voirie urbaine")
        .with("ref1_montant", "120000000")
        .with("ref1_typeClient", "public")
        .with("ref1_annee", "2023")
        .with("chargesAchats", "40000000")
        .with("chargesMainOeuvre", "30000000")
        .with("chargesImpots", "10000000")
        .with("ca_n", "1000000000")
        .with("ca_n1", "900000000")
        .with("ca_n2", "800000000")
        .with("resultatNet_n", "80000000")
        .with("ebe_n", "150000000")
        .with("capitauxPropres_n", "400000000")
        .with("totalBilan_n", "1000000000")
        .with("dettesFinancieres_n", "200000000")
        .with("dotationsAmort_n", "20000000")
        .with("tresorerieActif_n", "120000000")
        .with("tresoreriePassif_n", "20000000")
        .with("stocks_n", "50000000")
        .with("creances_n", "200000000")
        .with("dettesFournisseurs_n", "100000000")
        .with("dettesFiscales_n", "15000000")
        .with("actifCirculant_n", "500000000")
        .with("passifCirculant_n", "250000000")
        .with("creditDirect", "200000000")
        .with("engagementsSignature", "300000000")
        .with("lignesAutorisees", "400000000")
        .with("impayes", "0")
        .with("garantieInstitutionnelle", "oui")
        .with("garantieHypothecaire", "oui")
        .with("valeurBien", "84000000")
        .with("ribConforme", "oui")
        .with("consent", "on")
}

pub(super) fn immediate_policy() -> SubmissionPolicy {
    SubmissionPolicy {
        presentation_delay: Duration::ZERO,
        ..SubmissionPolicy::default()
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingNotifier {
    pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("notifier mutex poisoned").clone()
    }
}

impl SubmissionNotifier for RecordingNotifier {
    fn notify(&self, payload: SubmissionPayload) {
        self.payloads
            .lock()
            .expect("notifier mutex poisoned")
            .push(payload);
    }
}

pub(super) fn build_service() -> (
    Arc<DiagnosticService<RecordingNotifier>>,
    Arc<RecordingNotifier>,
) {
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(DiagnosticService::new(
        ScoringEngine::default(),
        notifier.clone(),
        immediate_policy(),
    ));
    (service, notifier)
}
