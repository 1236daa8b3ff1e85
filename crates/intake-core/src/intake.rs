//! The patient intake questionnaire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::de::scalar_as_string;

/// One session's intake answers.
///
/// Every field is free text. A field that is absent or `null` on the wire
/// deserializes to an empty string, so a partially filled form round-trips
/// unchanged. Numbers and booleans are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeRecord {
    /// Contact email (required by the form, never sent to the model).
    #[serde(deserialize_with = "scalar_as_string")]
    pub email: String,
    /// Sex (required by the form).
    #[serde(deserialize_with = "scalar_as_string")]
    pub sex: String,
    /// Age group label, e.g. "Adult (18–39)" (required by the form).
    #[serde(deserialize_with = "scalar_as_string")]
    pub age_group: String,
    /// Free-text symptom description.
    #[serde(deserialize_with = "scalar_as_string")]
    pub symptoms: String,
    /// Existing conditions.
    #[serde(deserialize_with = "scalar_as_string")]
    pub conditions: String,
    /// Known allergies.
    #[serde(deserialize_with = "scalar_as_string")]
    pub allergies: String,
    /// Current medications.
    #[serde(deserialize_with = "scalar_as_string")]
    pub medications: String,
    /// When the symptoms started.
    #[serde(deserialize_with = "scalar_as_string")]
    pub onset: String,
    /// What makes it better.
    #[serde(deserialize_with = "scalar_as_string")]
    pub better: String,
    /// What makes it worse.
    #[serde(deserialize_with = "scalar_as_string")]
    pub worse: String,
    /// Severity, nominally 1-10 but not validated.
    #[serde(deserialize_with = "scalar_as_string")]
    pub severity: String,
    /// What has been tried so far.
    #[serde(deserialize_with = "scalar_as_string")]
    pub tried: String,
}

/// A single field of [`IntakeRecord`], addressed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeField {
    Email,
    Sex,
    AgeGroup,
    Symptoms,
    Conditions,
    Allergies,
    Medications,
    Onset,
    Better,
    Worse,
    Severity,
    Tried,
}

impl IntakeField {
    /// All fields in form order.
    pub const ALL: [IntakeField; 12] = [
        IntakeField::Email,
        IntakeField::Sex,
        IntakeField::AgeGroup,
        IntakeField::Symptoms,
        IntakeField::Conditions,
        IntakeField::Allergies,
        IntakeField::Medications,
        IntakeField::Onset,
        IntakeField::Better,
        IntakeField::Worse,
        IntakeField::Severity,
        IntakeField::Tried,
    ];

    /// Fields the form refuses to submit without.
    pub const REQUIRED: [IntakeField; 3] =
        [IntakeField::Sex, IntakeField::AgeGroup, IntakeField::Email];

    /// The camelCase name used on the wire and in storage.
    pub fn wire_name(self) -> &'static str {
        match self {
            IntakeField::Email => "email",
            IntakeField::Sex => "sex",
            IntakeField::AgeGroup => "ageGroup",
            IntakeField::Symptoms => "symptoms",
            IntakeField::Conditions => "conditions",
            IntakeField::Allergies => "allergies",
            IntakeField::Medications => "medications",
            IntakeField::Onset => "onset",
            IntakeField::Better => "better",
            IntakeField::Worse => "worse",
            IntakeField::Severity => "severity",
            IntakeField::Tried => "tried",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            IntakeField::Email => "Email",
            IntakeField::Sex => "Sex",
            IntakeField::AgeGroup => "Age Group",
            IntakeField::Symptoms => "Symptoms",
            IntakeField::Conditions => "Existing Conditions",
            IntakeField::Allergies => "Allergies",
            IntakeField::Medications => "Current Medications",
            IntakeField::Onset => "Onset",
            IntakeField::Better => "What makes it better",
            IntakeField::Worse => "What makes it worse",
            IntakeField::Severity => "Severity (1-10)",
            IntakeField::Tried => "What has been tried",
        }
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for IntakeField {
    type Err = String;

    /// Accepts the wire name, case-insensitively, with `-` or `_` allowed
    /// in place of camel case (`age-group`, `age_group`, `ageGroup`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        IntakeField::ALL
            .into_iter()
            .find(|field| field.wire_name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("unknown intake field: {}", s))
    }
}

impl IntakeRecord {
    /// Read a field.
    pub fn get(&self, field: IntakeField) -> &str {
        match field {
            IntakeField::Email => &self.email,
            IntakeField::Sex => &self.sex,
            IntakeField::AgeGroup => &self.age_group,
            IntakeField::Symptoms => &self.symptoms,
            IntakeField::Conditions => &self.conditions,
            IntakeField::Allergies => &self.allergies,
            IntakeField::Medications => &self.medications,
            IntakeField::Onset => &self.onset,
            IntakeField::Better => &self.better,
            IntakeField::Worse => &self.worse,
            IntakeField::Severity => &self.severity,
            IntakeField::Tried => &self.tried,
        }
    }

    /// Overwrite a field.
    pub fn set(&mut self, field: IntakeField, value: impl Into<String>) {
        let value = value.into();
        match field {
            IntakeField::Email => self.email = value,
            IntakeField::Sex => self.sex = value,
            IntakeField::AgeGroup => self.age_group = value,
            IntakeField::Symptoms => self.symptoms = value,
            IntakeField::Conditions => self.conditions = value,
            IntakeField::Allergies => self.allergies = value,
            IntakeField::Medications => self.medications = value,
            IntakeField::Onset => self.onset = value,
            IntakeField::Better => self.better = value,
            IntakeField::Worse => self.worse = value,
            IntakeField::Severity => self.severity = value,
            IntakeField::Tried => self.tried = value,
        }
    }

    /// Required fields that are blank, in form order.
    pub fn missing_required(&self) -> Vec<IntakeField> {
        IntakeField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// True when every field is blank.
    pub fn is_empty(&self) -> bool {
        IntakeField::ALL
            .into_iter()
            .all(|field| self.get(field).trim().is_empty())
    }
}
