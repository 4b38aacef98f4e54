//! Response Parser — pulls the `{worldClass, notApproved}` object out of raw
//! completion text.
//!
//! Models wrap JSON in fences, prepend "Here is the result:", or get cut off
//! mid-sentence. Extraction is an ordered list of strategies, each a pure
//! `&str -> Option<Value>`; the first one that yields a JSON object wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// How many characters of the raw text to keep for diagnostics.
const PREVIEW_CHARS: usize = 200;

pub const WORLD_CLASS_KEY: &str = "worldClass";
pub const NOT_APPROVED_KEY: &str = "notApproved";

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").expect("invalid fenced-object regex")
});

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in completion ({len} chars): {preview:?}")]
    Parse { len: usize, preview: String },

    #[error("completion JSON is missing required keys: {}", missing.join(", "))]
    Schema { missing: Vec<&'static str> },
}

/// One extraction attempt. Tried in `ExtractionStrategy::ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Strip a surrounding markdown fence, parse the rest.
    FenceStripped,
    /// First `{` through last `}`.
    OuterBraces,
    /// A fenced block anywhere in the text whose body is an object.
    FencedBlock,
    /// First `{` through its balancing `}`.
    BalancedBraces,
}

impl ExtractionStrategy {
    pub const ORDER: [ExtractionStrategy; 4] = [
        ExtractionStrategy::FenceStripped,
        ExtractionStrategy::OuterBraces,
        ExtractionStrategy::FencedBlock,
        ExtractionStrategy::BalancedBraces,
    ];

    pub fn extract(self, raw: &str) -> Option<Value> {
        let candidate = match self {
            ExtractionStrategy::FenceStripped => Some(strip_json_fences(raw)),
            ExtractionStrategy::OuterBraces => outer_braces(raw),
            ExtractionStrategy::FencedBlock => FENCED_OBJECT
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
            ExtractionStrategy::BalancedBraces => balanced_braces(raw),
        }?;

        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        }
    }
}

/// The two halves of a schema-conforming completion. Nested fields are left
/// untyped; the orchestrator applies its defaulting policy to them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCompletion {
    pub world_class: Value,
    pub not_approved: Value,
    pub strategy: ExtractionStrategy,
}

/// Runs the strategies in order and returns the first JSON object found.
pub fn extract_json_object(raw: &str) -> Option<(ExtractionStrategy, Value)> {
    ExtractionStrategy::ORDER
        .iter()
        .find_map(|&strategy| strategy.extract(raw).map(|value| (strategy, value)))
}

/// Extracts and schema-checks a completion.
pub fn parse_completion(raw: &str) -> Result<ParsedCompletion, ParseError> {
    let (strategy, value) = extract_json_object(raw).ok_or_else(|| ParseError::Parse {
        len: raw.len(),
        preview: raw.chars().take(PREVIEW_CHARS).collect(),
    })?;

    let Value::Object(mut object) = value else {
        // extract() only ever yields objects
        return Err(ParseError::Schema {
            missing: vec![WORLD_CLASS_KEY, NOT_APPROVED_KEY],
        });
    };

    let missing: Vec<&'static str> = [WORLD_CLASS_KEY, NOT_APPROVED_KEY]
        .into_iter()
        .filter(|key| !is_present(&object, key))
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::Schema { missing });
    }

    Ok(ParsedCompletion {
        world_class: object.remove(WORLD_CLASS_KEY).unwrap_or(Value::Null),
        not_approved: object.remove(NOT_APPROVED_KEY).unwrap_or(Value::Null),
        strategy,
    })
}

fn is_present(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(|v| !v.is_null())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"));
    match body {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Scans from the first `{` to the brace that closes it, skipping braces
/// inside JSON strings.
fn balanced_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
