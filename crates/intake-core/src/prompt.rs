//! Prompt builders and prompt fingerprinting.
//!
//! Both builders are pure: the same record always yields the same prompt.
//! Blank fields are replaced by a placeholder so the model never sees an
//! empty interpolation.

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::intake::{IntakeField, IntakeRecord};

/// System instruction for summary generation.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful medical education assistant. \
You provide educational information only, not medical diagnoses or treatment advice. \
Always remind users to consult healthcare professionals.";

/// System instruction for follow-up answers.
pub const FOLLOW_UP_SYSTEM_PROMPT: &str = "You are a compassionate medical education assistant. \
You provide educational information only, not medical diagnoses or treatment advice. \
Always remind users to consult healthcare professionals for proper medical care.";

const NO_PREVIOUS_SUMMARY: &str = "No previous summary available";

/// Clinical fields in prompt order. Email is contact data and stays out.
const PROMPT_FIELDS: [IntakeField; 11] = [
    IntakeField::Sex,
    IntakeField::AgeGroup,
    IntakeField::Symptoms,
    IntakeField::Onset,
    IntakeField::Severity,
    IntakeField::Conditions,
    IntakeField::Allergies,
    IntakeField::Medications,
    IntakeField::Better,
    IntakeField::Worse,
    IntakeField::Tried,
];

fn placeholder(field: IntakeField) -> &'static str {
    match field {
        IntakeField::Conditions | IntakeField::Allergies | IntakeField::Medications => "None",
        IntakeField::Tried => "Nothing yet",
        _ => "Not specified",
    }
}

fn field_or_placeholder(record: &IntakeRecord, field: IntakeField) -> &str {
    let value = record.get(field).trim();
    if value.is_empty() {
        placeholder(field)
    } else {
        value
    }
}

fn write_patient_information(out: &mut String, record: &IntakeRecord) {
    out.push_str("Patient Information:\n");
    for field in PROMPT_FIELDS {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "- {}: {}",
            field.label(),
            field_or_placeholder(record, field)
        );
    }
}

/// Build the user prompt asking for a structured educational summary.
///
/// Never fails: an empty record produces a prompt made of placeholders.
pub fn build_summary_prompt(record: &IntakeRecord) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(
        "You are a medical education assistant. Based on the following patient information, \
provide an educational summary. This is NOT a diagnosis, but educational information only.\n\n",
    );
    write_patient_information(&mut prompt, record);
    prompt.push_str(
        r#"
Please provide:
1. A brief summary of the symptoms and key information
2. 2-3 possible conditions that could explain these symptoms (for educational purposes only)
3. 4-5 general self-care recommendations
4. Specific warning signs that would require immediate medical attention

Format your response as a JSON object with the following structure:
{
  "summary": "Brief summary text",
  "possibleConditions": [
    {
      "name": "Condition name",
      "description": "Educational description"
    }
  ],
  "selfCare": [
    "Self-care recommendation 1",
    "Self-care recommendation 2"
  ],
  "warningSign": [
    "Warning sign 1",
    "Warning sign 2"
  ]
}

Remember: This is educational information only, not medical advice. Always emphasize the importance of consulting healthcare professionals."#,
    );
    prompt
}

/// Build the user prompt for a follow-up question.
///
/// The caller is responsible for rejecting blank questions before calling
/// this; see [`answer_follow_up`](crate::answer_follow_up).
pub fn build_follow_up_prompt(
    question: &str,
    record: &IntakeRecord,
    previous_summary: Option<&str>,
) -> String {
    let previous_summary = previous_summary
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
        .unwrap_or(NO_PREVIOUS_SUMMARY);

    let mut prompt = String::with_capacity(2048);
    prompt.push_str(
        "You are a helpful medical education assistant. A patient has asked a follow-up \
question about their symptoms.\n\n",
    );
    write_patient_information(&mut prompt, record);
    let _ = write!(
        prompt,
        "\nPrevious Summary:\n{}\n\nPatient's Follow-Up Question:\n{}\n",
        previous_summary, question
    );
    prompt.push_str(
        r#"
Please provide a helpful, educational response to their question. Remember:
1. This is educational information only, not medical advice
2. Encourage them to consult healthcare professionals for diagnosis and treatment
3. Be empathetic and supportive
4. Provide clear, easy-to-understand information
5. If the question is about serious symptoms, remind them to seek immediate medical care

Provide your response in a friendly, conversational tone."#,
    );
    prompt
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
