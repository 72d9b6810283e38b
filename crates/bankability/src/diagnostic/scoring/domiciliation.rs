use serde::{Deserialize, Serialize};

use super::signal::Signal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domiciliation {
    pub alert: bool,
    pub signal: Signal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Contract payments must land at the financing bank; only an explicit "no" raises an alert.
pub fn check(bank_details_match: Option<bool>) -> Domiciliation {
    if bank_details_match == Some(false) {
        return Domiciliation {
            alert: true,
            signal: Signal::Orange,
            message: Some(
                "Le RIB du contrat ne correspond pas à la banque de financement. Une attestation de virement irrévocable sera nécessaire."
                    .to_string(),
            ),
        };
    }

    Domiciliation {
        alert: false,
        signal: Signal::Green,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_bank_details_are_flagged() {
        let result = check(Some(false));
        assert!(result.alert);
        assert_eq!(result.signal, Signal::Orange);
    }

    #[test]
    fn unanswered_question_is_not_flagged() {
        assert!(!check(None).alert);
        assert_eq!(check(Some(true)).signal, Signal::Green);
    }
}
