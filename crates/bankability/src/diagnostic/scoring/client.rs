use serde::{Deserialize, Serialize};

use super::signal::Alert;
use crate::diagnostic::domain::{ContractingAuthority, FundingSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientQuality {
    pub authority: ContractingAuthority,
    pub score: u32,
    pub label: String,
    pub reliability: String,
    pub alerts: Vec<Alert>,
}

fn profile(authority: ContractingAuthority) -> (u32, &'static str, &'static str) {
    match authority {
        ContractingAuthority::State => (10, "État / Administration centrale", "Très élevée"),
        ContractingAuthority::LocalAuthority => (8, "Collectivité locale", "Élevée"),
        ContractingAuthority::PublicEnterprise => (9, "Entreprise publique", "Très élevée"),
        ContractingAuthority::LargePrivateGroup => {
            (8, "Grand groupe / Multinationale", "Élevée")
        }
        ContractingAuthority::PrivateSme => (5, "PME privée", "Modérée"),
        ContractingAuthority::Ngo => (7, "ONG / Organisation internationale", "Bonne"),
        ContractingAuthority::Unspecified => (5, "Non précisé", "Inconnue"),
    }
}

pub fn analyze(authority: ContractingAuthority, funding: FundingSource) -> ClientQuality {
    let (score, label, reliability) = profile(authority);

    let mut alerts = Vec::new();
    if authority == ContractingAuthority::LocalAuthority
        && funding == FundingSource::AutonomousBudget
    {
        alerts.push(Alert::warning(
            "Pour une collectivité locale avec budget autonome, vérifiez la disponibilité d'une ligne budgétaire affectée au projet.",
        ));
    }

    ClientQuality {
        authority,
        score,
        label: label.to_string(),
        reliability: reliability.to_string(),
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_scores_highest() {
        let quality = analyze(ContractingAuthority::State, FundingSource::Other);
        assert_eq!(quality.score, 10);
        assert!(quality.alerts.is_empty());
    }

    #[test]
    fn every_authority_code_maps_to_its_profile() {
        let table = [
            ("etat", 10, "État / Administration centrale", "Très élevée"),
            ("collectivite", 8, "Collectivité locale", "Élevée"),
            ("entreprise_publique", 9, "Entreprise publique", "Très élevée"),
            ("prive_grand_groupe", 8, "Grand groupe / Multinationale", "Élevée"),
            ("prive_pme", 5, "PME privée", "Modérée"),
            ("ong", 7, "ONG / Organisation internationale", "Bonne"),
            ("", 5, "Non précisé", "Inconnue"),
        ];

        for (code, score, label, reliability) in table {
            let authority = ContractingAuthority::from_code(Some(code));
            let quality = analyze(authority, FundingSource::Other);
            assert_eq!(quality.authority, authority, "code {code}");
            assert_eq!(quality.score, score, "code {code}");
            assert_eq!(quality.label, label, "code {code}");
            assert_eq!(quality.reliability, reliability, "code {code}");
        }
    }

    #[test]
    fn unknown_type_defaults_to_five() {
        let quality = analyze(ContractingAuthority::Unspecified, FundingSource::Other);
        assert_eq!(quality.score, 5);
        assert_eq!(quality.label, "Non précisé");
    }

    #[test]
    fn local_authority_on_autonomous_budget_warns() {
        let quality = analyze(
            ContractingAuthority::LocalAuthority,
            FundingSource::AutonomousBudget,
        );
        assert_eq!(quality.score, 8);
        assert_eq!(quality.alerts.len(), 1);

        let other = analyze(ContractingAuthority::State, FundingSource::AutonomousBudget);
        assert!(other.alerts.is_empty());
    }
}
