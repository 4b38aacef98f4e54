// Cross-cutting prompt fragments shared by every completion-backed feature.
// Feature-specific templates live in that feature's prompts.rs.

/// Output contract appended to system prompts that expect a single JSON object.
pub const JSON_ONLY_CONTRACT: &str =
    "Return STRICT JSON only (no prose, no markdown, no code fences). \
    The response must be a single JSON object and nothing else.";
