//! Plain-text rendering of the form, the results view and the conversation.

use std::fmt::Write;

use intake_core::{FollowUpEntry, IntakeField, IntakeRecord, SummaryResult};

/// Shown under every summary.
pub const DISCLAIMER: &str = "This information is for educational purposes only and is not a \
medical diagnosis. Please consult a qualified healthcare professional about your symptoms.";

/// Render the results view.
///
/// Possible conditions and self-care are left out entirely when empty.
/// Warning signs always render, from the built-in list if the model gave
/// none.
pub fn render_summary(result: &SummaryResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "=======");
    let _ = writeln!(out, "{}", result.summary.trim());

    if !result.possible_conditions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Possible conditions");
        let _ = writeln!(out, "-------------------");
        for condition in &result.possible_conditions {
            let _ = writeln!(out, "* {}", condition.name);
            if !condition.description.trim().is_empty() {
                let _ = writeln!(out, "  {}", condition.description.trim());
            }
        }
    }

    if !result.self_care.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Self-care");
        let _ = writeln!(out, "---------");
        for item in &result.self_care {
            let _ = writeln!(out, "* {}", item);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Seek medical attention if you notice");
    let _ = writeln!(out, "------------------------------------");
    for sign in result.warning_signs() {
        let _ = writeln!(out, "! {}", sign);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", DISCLAIMER);
    out
}

/// Render the form, one labelled line per field.
pub fn render_form(record: &IntakeRecord) -> String {
    let mut out = String::new();
    for field in IntakeField::ALL {
        let value = record.get(field);
        let marker = if IntakeField::REQUIRED.contains(&field) { "*" } else { " " };
        let shown = if value.trim().is_empty() { "-" } else { value };
        let _ = writeln!(out, "{}{:<22} {}", marker, field.label(), shown);
    }
    out
}

/// Render the conversation, oldest first.
pub fn render_history(entries: &[FollowUpEntry]) -> String {
    if entries.is_empty() {
        return "No follow-up questions yet.\n".to_string();
    }

    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out);
        }
        let _ = writeln!(
            out,
            "[{}] Q: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.question
        );
        let _ = writeln!(out, "A: {}", entry.answer);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{PossibleCondition, FALLBACK_WARNING_SIGNS};

    #[test]
    fn test_empty_sections_are_omitted_but_warnings_fall_back() {
        let result = SummaryResult {
            summary: "Mild headache.".to_string(),
            ..Default::default()
        };

        let text = render_summary(&result);
        assert!(text.contains("Mild headache."));
        assert!(!text.contains("Possible conditions"));
        assert!(!text.contains("Self-care"));
        for sign in FALLBACK_WARNING_SIGNS {
            assert!(text.contains(sign), "missing fallback sign {sign}");
        }
        assert!(text.ends_with(&format!("{}\n", DISCLAIMER)));
    }

    #[test]
    fn test_model_sections_render() {
        let result = SummaryResult {
            summary: "s".to_string(),
            possible_conditions: vec![PossibleCondition {
                name: "Tension headache".to_string(),
                description: "Muscle tightness".to_string(),
            }],
            self_care: vec!["Hydrate".to_string()],
            warning_sign: vec!["Sudden severe headache".to_string()],
        };

        let text = render_summary(&result);
        assert!(text.contains("* Tension headache\n  Muscle tightness"));
        assert!(text.contains("* Hydrate"));
        assert!(text.contains("! Sudden severe headache"));
        assert!(!text.contains(FALLBACK_WARNING_SIGNS[0]));
    }

    #[test]
    fn test_render_form_marks_required_and_blank() {
        let record = IntakeRecord {
            sex: "Female".to_string(),
            ..Default::default()
        };

        let text = render_form(&record);
        assert_eq!(text.lines().count(), IntakeField::ALL.len());
        let sex_line = text.lines().find(|l| l.contains("Female")).unwrap();
        assert!(sex_line.starts_with('*'));
        let onset_line = text
            .lines()
            .find(|l| l.contains(IntakeField::Onset.label()))
            .unwrap();
        assert!(onset_line.trim_end().ends_with('-'));
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "No follow-up questions yet.\n");

        let entries = vec![
            FollowUpEntry::new("First?", "One."),
            FollowUpEntry::new("Second?", "Two."),
        ];
        let text = render_history(&entries);
        let first = text.find("Q: First?").unwrap();
        let second = text.find("Q: Second?").unwrap();
        assert!(first < second);
        assert!(text.contains("A: Two."));
    }
}
