use std::ops::Range;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::criteria::{parse_range, CriteriaDefaults};
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Placeholder shipped in example `.env` files; treated as no key at all.
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Origins always allowed by CORS, in addition to `FRONTEND_URL`.
const PUBLISHED_ORIGINS: &[&str] = &[
    "https://tobinslaven.github.io",
    "https://tobinslaven.github.io/BYOA-JTsubmission-examples",
];

/// Whether a completion credential is available. Absence is not an error:
/// every request is then served by the fallback generator.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionConfig {
    Configured {
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    },
    Unconfigured,
}

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion: CompletionConfig,
    pub criteria_defaults: CriteriaDefaults,
    pub frontend_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let usable_key = |name: &str| {
            lookup(name)
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
        };
        let api_key = usable_key("OPENAI_API_KEY").or_else(|| usable_key("OPENAI_KEY"));

        let completion = match api_key {
            Some(api_key) => {
                let timeout_secs = match lookup("COMPLETION_TIMEOUT_SECS") {
                    Some(raw) => raw
                        .trim()
                        .parse::<u64>()
                        .context("COMPLETION_TIMEOUT_SECS must be a whole number of seconds")?,
                    None => 120,
                };
                CompletionConfig::Configured {
                    api_key,
                    model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                    base_url: lookup("OPENAI_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                    timeout: Duration::from_secs(timeout_secs),
                }
            }
            None => CompletionConfig::Unconfigured,
        };

        let defaults = CriteriaDefaults::default();
        let criteria_defaults = CriteriaDefaults {
            covered: range_var(&lookup, "DEFAULT_COVERED_RANGE", defaults.covered)?,
            missing: range_var(&lookup, "DEFAULT_MISSING_RANGE", defaults.missing)?,
        };

        Ok(Config {
            completion,
            criteria_defaults,
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// CORS allow-list: the configured frontend plus the published pages.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];
        origins.extend(PUBLISHED_ORIGINS.iter().map(|o| o.to_string()));
        origins
    }
}

fn range_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Range<usize>,
) -> Result<Range<usize>> {
    match lookup(key) {
        Some(raw) => parse_range(&raw)
            .with_context(|| format!("{key} must look like 'start..end', got '{raw}'")),
        None => Ok(default),
    }
}
