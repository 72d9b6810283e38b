use serde::{Deserialize, Serialize};

/// Severity level used across every analyzer, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Green,
    Yellow,
    Orange,
    Red,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Green => "VERT",
            Signal::Yellow => "JAUNE",
            Signal::Orange => "ORANGE",
            Signal::Red => "ROUGE",
        }
    }

    /// Raise the severity to at least `floor`, never lowering it.
    pub fn escalate(self, floor: Signal) -> Signal {
        self.max(floor)
    }
}

/// Quotient that may have no meaningful value because its denominator vanished.
///
/// Serialized as a plain number, or `null` when not applicable. Every threshold
/// comparison against [`Ratio::NotApplicable`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ratio {
    Finite(f64),
    NotApplicable,
}

impl Ratio {
    /// Divide, yielding `NotApplicable` when `applicable` is false.
    pub fn divide_when(numerator: f64, denominator: f64, applicable: bool) -> Self {
        if applicable && denominator != 0.0 {
            Ratio::Finite(numerator / denominator)
        } else {
            Ratio::NotApplicable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Finite(value) => Some(*value),
            Ratio::NotApplicable => None,
        }
    }

    pub fn at_least(&self, threshold: f64) -> bool {
        self.value().map(|value| value >= threshold).unwrap_or(false)
    }

    pub fn at_most(&self, threshold: f64) -> bool {
        self.value().map(|value| value <= threshold).unwrap_or(false)
    }

    pub fn above(&self, threshold: f64) -> bool {
        self.value().map(|value| value > threshold).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Danger,
    Warning,
}

/// Advisory message attached to an analyzer result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Danger,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
        }
    }
}

/// Render an amount the way the applicant sees it: rounded, thin-space grouped, in FCFA.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-{grouped} FCFA")
    } else {
        format!("{grouped} FCFA")
    }
}
