// Example generation: criteria catalog, prompt building, response parsing,
// terminology normalization, guardrails, fallback templates and the
// orchestrator that sequences them.
// All completion calls go through llm_client.

pub mod criteria;
pub mod fallback;
pub mod generator;
pub mod guardrails;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod terminology;
