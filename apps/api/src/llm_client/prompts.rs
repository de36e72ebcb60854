// Cross-cutting prompt fragments shared by all LLM call sites.
// Each feature module defines its own prompts.rs alongside it; this file
// holds only the pieces common to every structured-output prompt.

/// Instruction appended to every prompt that expects machine-parseable JSON.
/// The parser strips code fences anyway, but asking for bare JSON keeps the
/// failure rate down.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with valid JSON only. \
    Do not include any text outside the JSON. \
    Do not use markdown code fences.";
