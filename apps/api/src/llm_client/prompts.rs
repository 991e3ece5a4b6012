// Shared prompt fragments. Each feature that uses the AI layer keeps its own
// prompts.rs alongside it; this file only holds cross-cutting text.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are an AI assistant for a talent intelligence platform. \
    Respond ONLY with valid JSON that matches the requested schema and avoid prose. \
    Do NOT use markdown code fences.";
