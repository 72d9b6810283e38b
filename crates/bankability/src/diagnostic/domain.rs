use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::form::FormValues;

/// Positional reference slots offered by the intake form (`ref1_*` .. `ref5_*`).
pub const MAX_REFERENCES: usize = 5;

/// Contracting authority (maître d'ouvrage) that commissioned the works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractingAuthority {
    State,
    LocalAuthority,
    PublicEnterprise,
    LargePrivateGroup,
    PrivateSme,
    Ngo,
    Unspecified,
}

impl ContractingAuthority {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("etat") => Self::State,
            Some("collectivite") => Self::LocalAuthority,
            Some("entreprise_publique") => Self::PublicEnterprise,
            Some("prive_grand_groupe") => Self::LargePrivateGroup,
            Some("prive_pme") => Self::PrivateSme,
            Some("ong") => Self::Ngo,
            _ => Self::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    AutonomousBudget,
    Other,
}

impl FundingSource {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("budget_autonome") => Self::AutonomousBudget,
            _ => Self::Other,
        }
    }
}

/// Client category of a previously executed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceClientType {
    Public,
    LargeGroup,
    Private,
    Individual,
    Other,
}

impl ReferenceClientType {
    pub fn from_code(code: Option<&str>) -> Option<Self> {
        match code.map(str::trim)? {
            "" => None,
            "public" => Some(Self::Public),
            "grand_groupe" => Some(Self::LargeGroup),
            "prive" => Some(Self::Private),
            "particulier" => Some(Self::Individual),
            _ => Some(Self::Other),
        }
    }

    pub fn is_institutional(&self) -> bool {
        matches!(self, Self::Public | Self::LargeGroup)
    }
}

/// Past contract the applicant cites as proof of technical capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceContract {
    pub title: Option<String>,
    pub amount: f64,
    pub client_type: Option<ReferenceClientType>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Construction,
    Other,
}

/// Contract the advance is requested against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub amount: f64,
    pub requested_amount: f64,
    pub order_of_service_date: Option<NaiveDate>,
    pub planned_end_date: Option<NaiveDate>,
    pub receives_start_advance: bool,
    pub start_advance_rate: Option<f64>,
}

/// Forecast charges to execute the contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractCharges {
    pub purchases: f64,
    pub labor: f64,
    pub taxes: f64,
}

/// Balance-sheet and income-statement figures for the latest closed year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub revenue: f64,
    pub net_result: f64,
    pub ebitda: f64,
    pub equity: f64,
    pub total_assets: f64,
    pub financial_debt: f64,
    pub depreciation: f64,
    pub cash_assets: f64,
    pub cash_liabilities: f64,
    pub stocks: f64,
    pub receivables: f64,
    pub trade_payables: f64,
    pub tax_debt: f64,
    pub current_assets: f64,
    pub current_liabilities: f64,
}

/// Revenue over three consecutive years; prior years may be undeclared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueHistory {
    pub current: f64,
    pub previous: Option<f64>,
    pub two_years_ago: Option<f64>,
}

/// Bank commitments as declared by the applicant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BankPosition {
    pub direct_credit: f64,
    pub signature_commitments: f64,
    pub authorized_lines: f64,
    pub unpaid: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guarantees {
    pub institutional: bool,
    pub mortgage: bool,
    pub mortgaged_asset_value: f64,
}

/// Typed view over a submitted form, decoupled from the form's field naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub contract: ContractTerms,
    pub authority: ContractingAuthority,
    pub funding_source: FundingSource,
    pub sector: Sector,
    pub annual_revenue: f64,
    pub references: Vec<ReferenceContract>,
    pub charges: ContractCharges,
    pub statements: FinancialStatements,
    pub revenue_history: RevenueHistory,
    pub bank: BankPosition,
    pub guarantees: Guarantees,
    /// `None` when the applicant did not answer the domiciliation question.
    pub bank_details_match: Option<bool>,
}

impl LoanApplication {
    pub fn from_form(form: &FormValues) -> Self {
        let contract = ContractTerms {
            amount: form.number("montantHT"),
            requested_amount: form.number("montantDemande"),
            order_of_service_date: form.date("dateSignatureOS"),
            planned_end_date: form.date("dateFinPrevue"),
            receives_start_advance: form.flag("recevoirAvance"),
            start_advance_rate: form.optional_number("tauxAvanceDemarrage"),
        };

        let sector = match form.text("secteurActivite").as_deref() {
            Some("btp") => Sector::Construction,
            _ => Sector::Other,
        };

        let statements = FinancialStatements {
            revenue: form.number("ca_n"),
            net_result: form.number("resultatNet_n"),
            ebitda: form.number("ebe_n"),
            equity: form.number("capitauxPropres_n"),
            total_assets: form.number("totalBilan_n"),
            financial_debt: form.number("dettesFinancieres_n"),
            depreciation: form.number("dotationsAmort_n"),
            cash_assets: form.number("tresorerieActif_n"),
            cash_liabilities: form.number("tresoreriePassif_n"),
            stocks: form.number("stocks_n"),
            receivables: form.number("creances_n"),
            trade_payables: form.number("dettesFournisseurs_n"),
            tax_debt: form.number("dettesFiscales_n"),
            current_assets: form.number("actifCirculant_n"),
            current_liabilities: form.number("passifCirculant_n"),
        };

        let bank_details_match = form
            .text("ribConforme")
            .map(|answer| !answer.eq_ignore_ascii_case("non"));

        Self {
            contract,
            authority: ContractingAuthority::from_code(form.text("typeMaitreOuvrage").as_deref()),
            funding_source: FundingSource::from_code(form.text("sourceFinancement").as_deref()),
            sector,
            annual_revenue: form.number("caAnnuel"),
            references: extract_references(form),
            charges: ContractCharges {
                purchases: form.number("chargesAchats"),
                labor: form.number("chargesMainOeuvre"),
                taxes: form.number("chargesImpots"),
            },
            statements,
            revenue_history: RevenueHistory {
                current: form.number("ca_n"),
                previous: form.optional_number("ca_n1"),
                two_years_ago: form.optional_number("ca_n2"),
            },
            bank: BankPosition {
                direct_credit: form.number("creditDirect"),
                signature_commitments: form.number("engagementsSignature"),
                authorized_lines: form.number("lignesAutorisees"),
                unpaid: form.number("impayes"),
            },
            guarantees: Guarantees {
                institutional: form.flag("garantieInstitutionnelle"),
                mortgage: form.flag("garantieHypothecaire"),
                mortgaged_asset_value: form.number("valeurBien"),
            },
            bank_details_match,
        }
    }
}

fn extract_references(form: &FormValues) -> Vec<ReferenceContract> {
    (1..=MAX_REFERENCES)
        .filter_map(|slot| {
            let title = form.text(&format!("ref{slot}_intitule"));
            let amount = form.number(&format!("ref{slot}_montant"));
            if title.is_none() && amount <= 0.0 {
                return None;
            }
            Some(ReferenceContract {
                title,
                amount,
                client_type: ReferenceClientType::from_code(
                    form.text(&format!("ref{slot}_typeClient")).as_deref(),
                ),
                year: form.text(&format!("ref{slot}_annee")),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_skip_empty_slots() {
        let form = FormValues::new()
            .with("ref1_intitule", "Route de Kaya")
            .with("ref1_montant", "150000000")
            .with("ref1_typeClient", "public")
            .with("ref2_montant", "0")
            .with("ref3_montant", "42000000")
            .with("ref6_intitule", "ignored slot");

        let application = LoanApplication::from_form(&form);

        assert_eq!(application.references.len(), 2);
        assert_eq!(
            application.references[0].client_type,
            Some(ReferenceClientType::Public)
        );
        assert_eq!(application.references[1].title, None);
        assert_eq!(application.references[1].amount, 42_000_000.0);
    }

    #[test]
    fn unknown_codes_fall_back_to_defaults() {
        let form = FormValues::new()
            .with("typeMaitreOuvrage", "cooperative")
            .with("secteurActivite", "services");

        let application = LoanApplication::from_form(&form);

        assert_eq!(application.authority, ContractingAuthority::Unspecified);
        assert_eq!(application.funding_source, FundingSource::Other);
        assert_eq!(application.sector, Sector::Other);
        assert_eq!(application.bank_details_match, None);
    }

    #[test]
    fn bank_details_answer_ignores_case() {
        for (answer, expected) in [
            ("non", Some(false)),
            ("NON", Some(false)),
            ("Oui", Some(true)),
        ] {
            let form = FormValues::new().with("ribConforme", answer);
            let application = LoanApplication::from_form(&form);
            assert_eq!(application.bank_details_match, expected, "answer {answer}");
        }
    }

    #[test]
    fn revenue_history_keeps_absent_years_distinct() {
        let form = FormValues::new().with("ca_n", "100").with("ca_n1", "90");

        let application = LoanApplication::from_form(&form);

        assert_eq!(application.revenue_history.previous, Some(90.0));
        assert_eq!(application.revenue_history.two_years_ago, None);
    }
}
