//! Terminology Normalizer — rewrites school vocabulary into studio vocabulary.
//!
//! Only model-sourced text goes through here; fallback templates are authored
//! compliant. Matching is whole-word and case-insensitive; the plural marker is
//! kept and a capitalised match yields a capitalised replacement.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Fixed substitutions, stem → domain equivalent.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("student", "learner"),
    ("teacher", "guide"),
    ("classroom", "studio"),
];

/// Every term the prompt tells the model to avoid. The guardrail pass reports
/// any that survive normalization.
pub const DISALLOWED_TERMS: &[&str] = &[
    "student",
    "teacher",
    "classroom",
    "assignment",
    "grade",
    "report card",
    "homework",
];

/// Terms the prompt tells the model to prefer.
pub const PREFERRED_TERMS: &[&str] = &[
    "learners",
    "guides",
    "studio",
    "badge",
    "session",
    "exhibition",
    "tribe",
    "audit committee",
    "world-class",
    "JourneyTracker (JT)",
];

static SUBSTITUTION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    SUBSTITUTIONS
        .iter()
        .map(|(stem, replacement)| {
            let pattern = format!(r"(?i)\b({stem})(s)?\b");
            (
                Regex::new(&pattern).expect("invalid terminology regex"),
                *replacement,
            )
        })
        .collect()
});

static DISALLOWED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = DISALLOWED_TERMS
        .iter()
        .map(|t| t.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})s?\b")).expect("invalid disallowed-term regex")
});

/// Replaces disallowed stems with their studio equivalents.
pub fn normalize(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in SUBSTITUTION_PATTERNS.iter() {
        out = pattern
            .replace_all(&out, |caps: &Captures<'_>| {
                let plural = caps.get(2).map_or("", |m| m.as_str());
                let starts_upper = caps[1].chars().next().is_some_and(char::is_uppercase);
                format!("{}{plural}", match_case(replacement, starts_upper))
            })
            .into_owned();
    }
    out
}

/// Lists every disallowed term still present in `text`, in order of appearance.
pub fn find_disallowed(text: &str) -> Vec<String> {
    DISALLOWED_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn match_case(word: &str, upper: bool) -> String {
    if !upper {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
