//! Example Generation — orchestrates one request/response cycle.
//!
//! Flow: validate → build prompts → completion → parse → normalize →
//!       guardrails → result.
//!
//! Any completion or parse failure short-circuits to the fallback generator;
//! the caller always gets a structurally valid result. Only request validation
//! can end a request without one.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::criteria::{CriteriaDefaults, Studio};
use crate::generation::fallback::generate_fallback;
use crate::generation::guardrails::{self, GuardrailReport};
use crate::generation::parser::{parse_completion, ParseError, ParsedCompletion};
use crate::generation::prompts::build_prompts;
use crate::generation::terminology::normalize;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::generation::{Example, GenerationResult};

/// Diagnostic used when no credential was configured.
pub const UNCONFIGURED_DIAGNOSTIC: &str = "completion capability not configured";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for example generation. Both fields are optional at the serde
/// layer so that missing fields surface as validation errors, not 422s.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateExamplesRequest {
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
}

/// A request that passed the validation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub studio: Studio,
    pub prompt_text: String,
}

impl GenerateExamplesRequest {
    pub fn validate(&self) -> Result<ValidatedRequest, AppError> {
        let (Some(studio), Some(prompt_text)) = (self.studio.as_deref(), self.prompt_text.as_deref())
        else {
            return Err(AppError::Validation(
                "Missing required fields: studio and promptText".to_string(),
            ));
        };

        let studio = studio
            .parse::<Studio>()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let prompt_text = prompt_text.trim();
        if prompt_text.is_empty() {
            return Err(AppError::Validation("promptText cannot be empty".to_string()));
        }

        Ok(ValidatedRequest {
            studio,
            prompt_text: prompt_text.to_string(),
        })
    }
}

/// Pipeline states. `Fallback` is reachable from `Requesting` or `Parsing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Building,
    Requesting,
    Parsing,
    Normalizing,
    Validating,
    Fallback,
    Done,
}

/// Anything on the generation path that sends a request to the fallback.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion capability not configured")]
    Unconfigured,

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl GenerationError {
    /// Short string surfaced as `apiError`.
    pub fn diagnostic(&self) -> String {
        let message = match self {
            GenerationError::Parse(ParseError::Parse { len, .. }) => {
                format!("Invalid response format from AI ({len} chars, no JSON object found)")
            }
            GenerationError::Parse(ParseError::Schema { missing }) => {
                format!("Invalid response structure from AI (missing {})", missing.join(", "))
            }
            other => other.to_string(),
        };
        message.chars().take(300).collect()
    }
}

/// Completion capability, present or not. Decided once at startup.
#[derive(Clone)]
pub enum Completion {
    Configured(Arc<dyn CompletionClient>),
    Unconfigured,
}

/// Everything one request produced: the result plus the advisory report and
/// the states it passed through.
///
/// The HTTP layer returns only `result`. `guardrails` and `phases` are the
/// in-process view of what the orchestrator already logs, kept so callers
/// and tests can inspect the report and the path taken without scraping logs.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub result: GenerationResult,
    #[allow(dead_code)]
    pub guardrails: GuardrailReport,
    #[allow(dead_code)]
    pub phases: Vec<GenerationPhase>,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Sequences the pipeline. Holds no per-request state, so one instance is
/// shared across all concurrent requests.
#[derive(Clone)]
pub struct Orchestrator {
    completion: Completion,
    defaults: CriteriaDefaults,
}

struct PhaseLog {
    phases: Vec<GenerationPhase>,
}

impl PhaseLog {
    fn new() -> Self {
        Self {
            phases: vec![GenerationPhase::Idle],
        }
    }

    fn enter(&mut self, phase: GenerationPhase) {
        debug!("generation phase {:?} -> {:?}", self.current(), phase);
        self.phases.push(phase);
    }

    fn current(&self) -> GenerationPhase {
        self.phases.last().copied().unwrap_or(GenerationPhase::Idle)
    }
}

impl Orchestrator {
    pub fn new(completion: Completion, defaults: CriteriaDefaults) -> Self {
        Self {
            completion,
            defaults,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.completion, Completion::Configured(_))
    }

    /// Validates the request, then runs the pipeline. The only error is a
    /// validation failure.
    pub async fn handle(
        &self,
        request: &GenerateExamplesRequest,
    ) -> Result<GenerationOutcome, AppError> {
        let request = request.validate()?;
        Ok(self.generate(request.studio, &request.prompt_text).await)
    }

    /// Runs the pipeline for an already-validated request. Infallible.
    pub async fn generate(&self, studio: Studio, prompt_text: &str) -> GenerationOutcome {
        let preview: String = prompt_text.chars().take(50).collect();
        info!("Generating examples for {}: {:?}", studio, preview);

        let mut log = PhaseLog::new();
        let criteria = studio.criteria();

        let result = match self.generate_from_model(studio, prompt_text, &mut log).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Falling back to template examples for {}: {}", studio, err);
                log.enter(GenerationPhase::Fallback);
                generate_fallback(studio, prompt_text, &self.defaults, err.diagnostic())
            }
        };

        log.enter(GenerationPhase::Validating);
        let report = guardrails::validate(&result, studio, criteria);
        for warning in &report.warnings {
            warn!("Guardrail ({}): {}", studio, warning);
        }

        log.enter(GenerationPhase::Done);
        info!(
            "Generated examples for {} (mock={}, guardrail warnings={})",
            studio,
            result.is_mock_data,
            report.warnings.len()
        );

        GenerationOutcome {
            result,
            guardrails: report,
            phases: log.phases,
        }
    }

    async fn generate_from_model(
        &self,
        studio: Studio,
        prompt_text: &str,
        log: &mut PhaseLog,
    ) -> Result<GenerationResult, GenerationError> {
        let Completion::Configured(client) = &self.completion else {
            return Err(GenerationError::Unconfigured);
        };

        log.enter(GenerationPhase::Building);
        let prompts = build_prompts(studio, prompt_text, studio.criteria());

        log.enter(GenerationPhase::Requesting);
        let raw = client.complete(&prompts, studio).await?;
        debug!("Completion for {} returned {} chars", studio, raw.len());

        log.enter(GenerationPhase::Parsing);
        let parsed = parse_completion(&raw)?;

        debug!("Parsed completion for {} via {:?}", studio, parsed.strategy);

        log.enter(GenerationPhase::Normalizing);
        Ok(self.assemble(studio, parsed))
    }

    /// Applies the defaulting policy to nested fields and normalizes text.
    fn assemble(&self, studio: Studio, parsed: ParsedCompletion) -> GenerationResult {
        let world_text = text_field(&parsed.world_class);
        let not_text = text_field(&parsed.not_approved);

        let covered = string_list(&parsed.world_class, "criteriaCovered")
            .unwrap_or_else(|| self.defaults.covered_for(studio));
        let missing = string_list(&parsed.not_approved, "criteriaMissing")
            .unwrap_or_else(|| self.defaults.missing_for(studio));

        GenerationResult {
            world_class: Example::world_class(normalize(&world_text), covered),
            not_approved: Example::not_approved(normalize(&not_text), missing),
            criteria_all: studio.criteria_owned(),
            is_mock_data: false,
            api_error: None,
        }
    }
}

/// `text` when it is a string; anything else counts as missing.
fn text_field(example: &Value) -> String {
    match example.get("text") {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

/// A string array field. Non-arrays count as missing; non-string entries are dropped.
fn string_list(example: &Value, key: &str) -> Option<Vec<String>> {
    let items = example.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
