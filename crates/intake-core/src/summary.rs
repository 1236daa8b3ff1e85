//! The structured summary returned by the model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::de::null_as_default;

/// Warning signs shown when the model supplies none.
///
/// Possible conditions and self-care have no fallback: leaving those out is
/// acceptable, leaving out urgent-care guidance is not.
pub const FALLBACK_WARNING_SIGNS: [&str; 7] = [
    "Severe or worsening symptoms",
    "Difficulty breathing or shortness of breath",
    "Chest pain or pressure",
    "Confusion, disorientation, or loss of consciousness",
    "High fever (over 103°F/39.4°C) or fever that doesn't respond to treatment",
    "Uncontrolled bleeding or severe injury",
    "Sudden weakness, numbness, or difficulty speaking",
];

/// A non-diagnostic possible explanation for the symptoms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossibleCondition {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// The four-part educational summary.
///
/// Missing or `null` keys deserialize empty; present keys of the wrong type
/// fail the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryResult {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub possible_conditions: Vec<PossibleCondition>,
    #[serde(deserialize_with = "null_as_default")]
    pub self_care: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub warning_sign: Vec<String>,
}

impl SummaryResult {
    /// Warning signs to display, falling back to [`FALLBACK_WARNING_SIGNS`]
    /// when the model returned none.
    pub fn warning_signs(&self) -> Vec<&str> {
        if self.warning_sign.is_empty() {
            FALLBACK_WARNING_SIGNS.to_vec()
        } else {
            self.warning_sign.iter().map(String::as_str).collect()
        }
    }

    /// True when the warning signs shown come from the built-in list.
    pub fn uses_fallback_warning_signs(&self) -> bool {
        self.warning_sign.is_empty()
    }
}

/// Result of parsing raw model text.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    /// The text is a summary object.
    Parsed(SummaryResult),
    /// The text could not be read as a summary; carries the raw text.
    Malformed { raw: String, reason: String },
}

impl SummaryOutcome {
    /// Parse raw completion text. Never yields a partially populated result.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<SummaryResult>(raw.trim()) {
            Ok(result) => SummaryOutcome::Parsed(result),
            Err(err) => {
                debug!(error = %err, "Model output is not a summary object");
                SummaryOutcome::Malformed {
                    raw: raw.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// The parsed summary, if any.
    pub fn parsed(&self) -> Option<&SummaryResult> {
        match self {
            SummaryOutcome::Parsed(result) => Some(result),
            SummaryOutcome::Malformed { .. } => None,
        }
    }
}
