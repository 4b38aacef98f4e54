// Prompt templates for example generation, and the Prompt Builder that fills them.
// One template family serves all three studios; studio differences come from
// the criteria list and the voice section.

use serde_json::Value;

use crate::generation::criteria::Studio;
use crate::generation::terminology::{DISALLOWED_TERMS, PREFERRED_TERMS};
use crate::llm_client::prompts::JSON_ONLY_CONTRACT;

/// Section labels every generated submission is expected to use, in order.
pub const SECTION_LABELS: &[&str] = &[
    "Goal",
    "Process",
    "Evidence",
    "Reflection",
    "Peer Feedback",
    "Next Step",
];

/// System prompt template.
/// Replace: {preferred_terms}, {avoided_terms}, {section_labels}, {studio},
///          {numbered_criteria}, {json_only_contract}
pub const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are a Guide at Acton Academy. Your job is to produce two contrasting JourneyTracker (JT) submissions from project directions: a WORLD-CLASS example and a NOT APPROVED example.

ACTON ETHOS & TERMS (MUST FOLLOW)
- Use: {preferred_terms}.
- Avoid: {avoided_terms}. Use these only if quoted from the prompt.
- Replace school words with studio words: students -> learners, teachers -> guides, classroom -> studio.
- Guides never judge quality or approve badges; peers do. Encourage peer review, not guide approval.

EXCELLENCE ORIENTATION
- Standards focus on doing hard things with freedom and responsibility.
- For repeated attempts: flag improvement ("better than last time").
- In upper studios, note world-class comparison and public exhibition/contest when appropriate.

VOICE & READABILITY BY STUDIO
- ES (7–11): Grade 2–4 readability; short sentences (≤12 words); 2–4 sentence paragraphs; first-person "I… because… I noticed… Next I will…". Keep each submission under 200 words.
- MS (12–15): Grade 6–8 readability; short headings and bullets allowed; concrete evidence and simple citations.
- LP (16–18): Professional, concise, plain English; clear claims -> evidence -> citation; analytical tone. The world-class submission should run at least 350 words.

STRUCTURE (use these section labels in the text)
{section_labels}

CRITERIA TO TARGET FOR {studio}
{numbered_criteria}

OUTPUT CONTRACT
- {json_only_contract}
- Use natural paragraphing and \n line breaks inside the JSON strings.
- WORLD-CLASS must explicitly satisfy the listed criteria for {studio}.
- NOT APPROVED must clearly miss several key criteria in a realistic way (respectful tone, no sarcasm).
- Use Acton terminology and studio context throughout."#;

/// User prompt template.
/// Replace: {prompt_text}, {studio}, {criteria_json}, {preferred_terms}
pub const USER_PROMPT_TEMPLATE: &str = r#"Project Directions: "{prompt_text}"

Studio: {studio}
Criteria: {criteria_json}

Create TWO JourneyTracker submissions about these directions for the specified studio:

1) WORLD-CLASS EXAMPLE: Meets ALL criteria. Clear sections: Goal, Process, Evidence, Reflection, Peer Feedback, Next Step.
2) NOT APPROVED EXAMPLE: Misses SEVERAL key criteria (e.g., no evidence, vague goal, no sources, no revision). Keep tone respectful and realistic.

FORMATTING
- Write like real learner work with natural paragraph breaks and headings.
- Use \n for line breaks. Keep readability aligned to the studio.

CRITICAL: Return ONLY valid JSON. No markdown, no code blocks, no extra text.

{
  "worldClass": {
    "text": "full JT text with line breaks",
    "criteriaCovered": ["criteria1", "criteria2", "criteria3"]
  },
  "notApproved": {
    "text": "full JT text with line breaks",
    "criteriaMissing": ["criteria4", "criteria5"]
  }
}

Rules:
- "criteriaCovered" and "criteriaMissing" must be copied verbatim from the provided Criteria array for {studio}. Do not invent criteria.
- Use Acton terms ({preferred_terms}).
- Do not ask a guide to approve a badge; suggest peer feedback or audit processes if relevant."#;

/// The two instructions sent to the completion capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds the system and user instructions. Pure; `prompt_text` is expected
/// to be non-empty and already trimmed.
pub fn build_prompts(studio: Studio, prompt_text: &str, criteria: &[&str]) -> PromptPair {
    let preferred = PREFERRED_TERMS.join(", ");

    let system = SYSTEM_PROMPT_TEMPLATE
        .replace("{preferred_terms}", &preferred)
        .replace("{avoided_terms}", &avoided_terms())
        .replace("{section_labels}", &SECTION_LABELS.join(" • "))
        .replace("{numbered_criteria}", &numbered(criteria))
        .replace("{json_only_contract}", JSON_ONLY_CONTRACT)
        .replace("{studio}", studio.code());

    let criteria_json = Value::from(criteria.to_vec()).to_string();

    // Project text goes in last so a literal "{studio}" in it survives verbatim.
    let user = USER_PROMPT_TEMPLATE
        .replace("{studio}", studio.code())
        .replace("{criteria_json}", &criteria_json)
        .replace("{preferred_terms}", &preferred)
        .replace("{prompt_text}", prompt_text);

    PromptPair { system, user }
}

fn avoided_terms() -> String {
    DISALLOWED_TERMS
        .iter()
        .map(|t| format!("{t}(s)"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn numbered(criteria: &[&str]) -> String {
    criteria
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n")
}
