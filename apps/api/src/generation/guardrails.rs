//! Guardrail Validator — advisory consistency checks on a finished result.
//!
//! Never blocks output. Every check runs; each failure adds one human-readable
//! warning. The orchestrator logs the report next to the result.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::generation::criteria::Studio;
use crate::generation::terminology::find_disallowed;
use crate::models::generation::{Example, GenerationResult};

/// Elementary submissions should stay short.
pub const ELEMENTARY_MAX_WORDS: usize = 200;
/// Launchpad submissions should show depth.
pub const LAUNCHPAD_MIN_WORDS: usize = 350;

static EVIDENCE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[[^\]\n]+\]|\b(?:link|photo|evidence|attachment)s?\b")
        .expect("invalid evidence-marker regex")
});

static SOURCE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:source|citation|reference|author|title)s?\b")
        .expect("invalid source-marker regex")
});

/// Lines that are only a section heading. Headings name a section, they are
/// not evidence of its content.
const HEADINGS: &[&str] = &[
    "goal",
    "process",
    "evidence",
    "sources",
    "source",
    "citations",
    "reflection",
    "peer feedback",
    "next step",
    "overview",
    "method",
    "findings",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuardrailReport {
    pub warnings: Vec<String>,
    pub all_clear: bool,
}

/// Word band for a studio: (minimum, maximum).
pub fn word_band(studio: Studio) -> (Option<usize>, Option<usize>) {
    match studio {
        Studio::Elementary => (None, Some(ELEMENTARY_MAX_WORDS)),
        Studio::Middle => (None, None),
        Studio::Launchpad => (Some(LAUNCHPAD_MIN_WORDS), None),
    }
}

pub fn validate(result: &GenerationResult, studio: Studio, criteria: &[&str]) -> GuardrailReport {
    let mut warnings = Vec::new();

    check_criteria_membership(result, criteria, &mut warnings);
    check_word_counts(result, studio, &mut warnings);
    check_missing_vs_markers(&result.not_approved, &mut warnings);
    check_vocabulary(result, &mut warnings);
    check_empty_text(result, &mut warnings);

    GuardrailReport {
        all_clear: warnings.is_empty(),
        warnings,
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn check_criteria_membership(result: &GenerationResult, criteria: &[&str], warnings: &mut Vec<String>) {
    let sides = [
        ("criteriaCovered", result.world_class.criteria_covered.as_deref()),
        ("criteriaMissing", result.not_approved.criteria_missing.as_deref()),
    ];
    for (field, entries) in sides {
        let unknown: Vec<&str> = entries
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|entry| !criteria.contains(entry))
            .collect();
        if !unknown.is_empty() {
            warnings.push(format!(
                "{field} contains entries not in the studio criteria: {}",
                quote_list(&unknown)
            ));
        }
    }
}

/// Word bands apply to model output only. Fallback templates are short by
/// construction and would always trip the Launchpad floor.
fn check_word_counts(result: &GenerationResult, studio: Studio, warnings: &mut Vec<String>) {
    if result.is_mock_data {
        return;
    }
    let (min, max) = word_band(studio);
    let sides = [
        ("world-class", &result.world_class),
        ("not-approved", &result.not_approved),
    ];
    for (label, example) in sides {
        let words = word_count(&example.text);
        if let Some(max) = max.filter(|&max| words > max) {
            warnings.push(format!(
                "{label} text is {words} words; {studio} submissions should stay under {max}"
            ));
        }
        if let Some(min) = min.filter(|&min| words < min) {
            warnings.push(format!(
                "{label} text is {words} words; {studio} submissions should be at least {min}"
            ));
        }
    }
}

fn check_missing_vs_markers(not_approved: &Example, warnings: &mut Vec<String>) {
    let missing = not_approved.criteria_missing.as_deref().unwrap_or_default();
    let body = body_without_headings(&not_approved.text);

    let claims_no_evidence = missing.iter().any(|c| c.to_lowercase().contains("evidence"));
    if claims_no_evidence {
        let found = markers(&EVIDENCE_MARKERS, &body);
        if !found.is_empty() {
            warnings.push(format!(
                "not-approved example is marked as missing evidence but contains evidence markers: {}",
                quote_list(&found)
            ));
        }
    }

    let claims_no_source = missing.iter().any(|c| c.to_lowercase().contains("source"));
    if claims_no_source {
        let found = markers(&SOURCE_MARKERS, &body);
        if !found.is_empty() {
            warnings.push(format!(
                "not-approved example is marked as missing sources but contains source markers: {}",
                quote_list(&found)
            ));
        }
    }
}

fn check_vocabulary(result: &GenerationResult, warnings: &mut Vec<String>) {
    let sides = [
        ("world-class", &result.world_class),
        ("not-approved", &result.not_approved),
    ];
    for (label, example) in sides {
        let found = find_disallowed(&example.text);
        if !found.is_empty() {
            let found: Vec<&str> = found.iter().map(String::as_str).collect();
            warnings.push(format!(
                "{label} text uses disallowed terms: {}",
                quote_list(&found)
            ));
        }
    }
}

fn check_empty_text(result: &GenerationResult, warnings: &mut Vec<String>) {
    if result.world_class.text.trim().is_empty() {
        warnings.push("world-class text is empty".to_string());
    }
    if result.not_approved.text.trim().is_empty() {
        warnings.push("not-approved text is empty".to_string());
    }
}

fn body_without_headings(text: &str) -> String {
    text.lines()
        .filter(|line| !HEADINGS.contains(&line.trim().to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn markers<'a>(pattern: &Regex, text: &'a str) -> Vec<&'a str> {
    let mut found: Vec<&str> = Vec::new();
    for m in pattern.find_iter(text) {
        if !found.iter().any(|f| f.eq_ignore_ascii_case(m.as_str())) {
            found.push(m.as_str());
        }
    }
    found
}

fn quote_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|i| format!("\"{i}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::criteria::CriteriaDefaults;
    use crate::generation::fallback::generate_fallback;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn result_for(studio: Studio, world_text: &str, not_text: &str) -> GenerationResult {
        let criteria = studio.criteria();
        GenerationResult {
            world_class: Example::world_class(
                world_text,
                criteria[..3].iter().map(|c| c.to_string()).collect(),
            ),
            not_approved: Example::not_approved(
                not_text,
                vec![criteria[5].to_string()],
            ),
            criteria_all: studio.criteria_owned(),
            is_mock_data: false,
            api_error: None,
        }
    }

    #[test]
    fn test_clean_result_is_all_clear() {
        let result = result_for(
            Studio::Elementary,
            "Goal\nMy goal is to grow beans.",
            "Goal\nI grew beans.",
        );
        let report = validate(&result, Studio::Elementary, Studio::Elementary.criteria());
        assert!(report.all_clear, "{:?}", report.warnings);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_invented_criteria_are_reported() {
        let mut result = result_for(Studio::Middle, "Goal\nShort.", "Goal\nShorter.");
        result
            .world_class
            .criteria_covered
            .as_mut()
            .unwrap()
            .push("Uses lots of color".to_string());
        result.not_approved.criteria_missing = Some(vec!["Has a title page".to_string()]);

        let report = validate(&result, Studio::Middle, Studio::Middle.criteria());
        assert!(!report.all_clear);
        assert!(report.warnings.iter().any(|w| w.contains("criteriaCovered") && w.contains("Uses lots of color")));
        assert!(report.warnings.iter().any(|w| w.contains("criteriaMissing") && w.contains("Has a title page")));
    }

    #[test]
    fn test_elementary_word_ceiling() {
        let result = result_for(Studio::Elementary, &words(250), "Goal\nI did it.");
        let report = validate(&result, Studio::Elementary, Studio::Elementary.criteria());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("250 words"));
        assert!(report.warnings[0].contains("200"));
    }

    #[test]
    fn test_launchpad_word_floor() {
        let result = result_for(Studio::Launchpad, &words(120), &words(400));
        let report = validate(&result, Studio::Launchpad, Studio::Launchpad.criteria());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("world-class text is 120 words"));
    }

    #[test]
    fn test_middle_has_no_word_band() {
        let result = result_for(Studio::Middle, &words(900), &words(5));
        let report = validate(&result, Studio::Middle, Studio::Middle.criteria());
        assert!(report.all_clear, "{:?}", report.warnings);
    }

    #[test]
    fn test_missing_evidence_with_photo_marker_is_contradiction() {
        let mut result = result_for(
            Studio::Elementary,
            "Goal\nMy goal is to draw.",
            "Goal\nI drew a cloud.\n\nEvidence\n[Photo: my poster]",
        );
        result.not_approved.criteria_missing =
            Some(vec![Studio::Elementary.criteria()[3].to_string()]);

        let report = validate(&result, Studio::Elementary, Studio::Elementary.criteria());
        assert!(!report.all_clear);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("missing evidence") && w.contains("[Photo: my poster]")));
    }

    #[test]
    fn test_missing_source_with_citation_marker_is_contradiction() {
        let mut result = result_for(
            Studio::Middle,
            "Goal\nShort.",
            "Goal\nResearch rain.\n\nI used a source from the library.",
        );
        result.not_approved.criteria_missing = Some(vec![Studio::Middle.criteria()[2].to_string()]);
        // "At least two credible sources cited" mentions "source"
        let report = validate(&result, Studio::Middle, Studio::Middle.criteria());
        assert!(report.warnings.iter().any(|w| w.contains("missing sources")));
    }

    #[test]
    fn test_plural_markers_are_detected() {
        let criteria = Studio::Middle.criteria();
        let mut result = result_for(
            Studio::Middle,
            "Goal\nShort.",
            "Goal\nI read three sources and added links and photos with citations.",
        );
        result.not_approved.criteria_missing =
            Some(vec![criteria[1].to_string(), criteria[2].to_string()]);

        let report = validate(&result, Studio::Middle, criteria);
        assert_eq!(report.warnings.len(), 2, "{:?}", report.warnings);
        assert!(report.warnings[0].contains("missing evidence"));
        assert!(report.warnings[0].contains("\"links\""));
        assert!(report.warnings[0].contains("\"photos\""));
        assert!(report.warnings[1].contains("missing sources"));
        assert!(report.warnings[1].contains("\"sources\""));
        assert!(report.warnings[1].contains("\"citations\""));
    }

    #[test]
    fn test_word_bands_skip_fallback_results() {
        let result = generate_fallback(
            Studio::Launchpad,
            "Design a bridge",
            &CriteriaDefaults::default(),
            "completion capability not configured",
        );
        let report = validate(&result, Studio::Launchpad, Studio::Launchpad.criteria());
        assert!(report.all_clear, "{:?}", report.warnings);

        let mut model_result = result.clone();
        model_result.is_mock_data = false;
        let report = validate(&model_result, Studio::Launchpad, Studio::Launchpad.criteria());
        assert_eq!(report.warnings.len(), 2, "{:?}", report.warnings);
    }

    #[test]
    fn test_section_headings_are_not_markers() {
        let mut result = result_for(
            Studio::Elementary,
            "Goal\nMy goal is to draw.",
            "Goal\nI did a project.\n\nEvidence\n(Nothing attached)\n\nReflection\nI think it is good.",
        );
        result.not_approved.criteria_missing = Some(vec![
            Studio::Elementary.criteria()[3].to_string(),
            Studio::Elementary.criteria()[4].to_string(),
        ]);
        let report = validate(&result, Studio::Elementary, Studio::Elementary.criteria());
        assert!(report.all_clear, "{:?}", report.warnings);
    }

    #[test]
    fn test_markers_ignored_when_not_claimed_missing() {
        let result = result_for(
            Studio::Elementary,
            "Goal\nMy goal is to draw.",
            "Goal\nI drew.\n[Photo: cloud]",
        );
        let report = validate(&result, Studio::Elementary, Studio::Elementary.criteria());
        assert!(report.all_clear, "{:?}", report.warnings);
    }

    #[test]
    fn test_disallowed_vocabulary_is_reported() {
        let result = result_for(
            Studio::Middle,
            "Goal\nFinish the homework for my grade.",
            "Goal\nI did it.",
        );
        let report = validate(&result, Studio::Middle, Studio::Middle.criteria());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("\"homework\""));
        assert!(report.warnings[0].contains("\"grade\""));
    }

    #[test]
    fn test_checks_do_not_short_circuit() {
        let mut result = result_for(Studio::Elementary, &format!("{} teacher", words(260)), "");
        result.not_approved.criteria_missing = Some(vec!["Invented".to_string()]);
        let report = validate(&result, Studio::Elementary, Studio::Elementary.criteria());
        // unknown criterion, word ceiling, vocabulary, empty not-approved text
        assert_eq!(report.warnings.len(), 4, "{:?}", report.warnings);
    }
}
