//! Criteria Catalog — the static, process-wide rubric for each studio.
//!
//! Order is meaningful: it drives display order in the UI and the default
//! covered/missing slices when the model omits them. Read-only; shared freely
//! across concurrent requests.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Studio tier. Drives the criteria set, output length target and voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Studio {
    /// Elementary Studio (ages 7–11).
    #[serde(rename = "ES")]
    Elementary,
    /// Middle Studio (ages 12–15).
    #[serde(rename = "MS")]
    Middle,
    /// Launchpad (ages 16–18).
    #[serde(rename = "LP")]
    Launchpad,
}

impl Studio {
    pub const ALL: [Studio; 3] = [Studio::Elementary, Studio::Middle, Studio::Launchpad];

    /// Wire code used in requests, prompts and saved comparisons.
    pub fn code(self) -> &'static str {
        match self {
            Studio::Elementary => "ES",
            Studio::Middle => "MS",
            Studio::Launchpad => "LP",
        }
    }

    /// The ordered criteria list for this studio.
    pub fn criteria(self) -> &'static [&'static str] {
        match self {
            Studio::Elementary => ELEMENTARY_CRITERIA,
            Studio::Middle => MIDDLE_CRITERIA,
            Studio::Launchpad => LAUNCHPAD_CRITERIA,
        }
    }

    /// Owned copy of the criteria, as returned in `criteriaAll`.
    pub fn criteria_owned(self) -> Vec<String> {
        self.criteria().iter().map(|c| c.to_string()).collect()
    }
}

impl fmt::Display for Studio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid studio '{0}'. Must be ES, MS, or LP")]
pub struct UnknownStudio(pub String);

impl FromStr for Studio {
    type Err = UnknownStudio;

    /// Exact, case-sensitive match on the wire code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Studio::ALL
            .into_iter()
            .find(|studio| studio.code() == s)
            .ok_or_else(|| UnknownStudio(s.to_string()))
    }
}

const ELEMENTARY_CRITERIA: &[&str] = &[
    "Complete sentences with correct capitalization and punctuation",
    "Simple goal in my own words (starts with \"My goal is…\")",
    "3–5 step process written as \"I…\" statements",
    "At least one labeled piece of evidence attached [photo/scan/link]",
    "Name one source OR observation (book title, website, expert, or field note)",
    "Reflection includes one thing learned and one next step",
    "Kind, specific peer feedback mentioned (who and what changed)",
];

const MIDDLE_CRITERIA: &[&str] = &[
    "Clear goal + deliverable + due date stated up front",
    "Evidence attached with captions (artifact, data table, photos, links)",
    "At least two credible sources cited (title/author/link)",
    "Personal reflection explains how thinking changed",
    "Revision noted (how this is better than last time)",
    "Peer feedback loop documented (who reviewed, what changed)",
    "All listed criteria addressed (no missing sections)",
];

const LAUNCHPAD_CRITERIA: &[&str] = &[
    "Professional tone and structure with clear headings",
    "Clear deliverable, constraints, and success metrics",
    "Three or more credible sources with in-line citations",
    "Original analysis supported by data/evidence (not summary)",
    "Comparison to a world-class example and gap analysis",
    "Real-world stakes shown (exhibition, contest, user test, stakeholder)",
    "Reflection on improvement vs. last iteration with next-step plan and date",
    "Attachments are well-formatted; all links verified",
];

/// Which slices of the catalog stand in for `criteriaCovered` / `criteriaMissing`
/// when the model omits them, and for every fallback result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaDefaults {
    pub covered: Range<usize>,
    pub missing: Range<usize>,
}

impl Default for CriteriaDefaults {
    fn default() -> Self {
        Self {
            covered: 0..3,
            missing: 3..5,
        }
    }
}

impl CriteriaDefaults {
    pub fn covered_for(&self, studio: Studio) -> Vec<String> {
        slice_clamped(studio.criteria(), &self.covered)
    }

    pub fn missing_for(&self, studio: Studio) -> Vec<String> {
        slice_clamped(studio.criteria(), &self.missing)
    }
}

fn slice_clamped(criteria: &[&str], range: &Range<usize>) -> Vec<String> {
    let end = range.end.min(criteria.len());
    let start = range.start.min(end);
    criteria[start..end].iter().map(|c| c.to_string()).collect()
}

/// Parses `"start..end"` as used by the `DEFAULT_*_RANGE` env vars.
pub fn parse_range(raw: &str) -> Option<Range<usize>> {
    let (start, end) = raw.trim().split_once("..")?;
    let start = start.trim().parse().ok()?;
    let end = end.trim().parse().ok()?;
    (start <= end).then_some(start..end)
}
