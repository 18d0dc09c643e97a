// Cross-cutting prompt fragments. Each module that calls the capability keeps
// its own prompts.rs next to it and composes these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated advice tied to the supplied student data.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every recommendation on the student profile, similar students and \
    opportunities provided below. Do NOT invent awards, admissions results, test scores \
    or programs that are not listed. If the context does not support a recommendation, omit it.";

/// Grade ordinals the model must use.
pub const GRADE_INSTRUCTION: &str = "\
    Grades are integers: 9 = freshman, 10 = sophomore, 11 = junior, 12 = senior. \
    Any grade before the student's current grade is already completed: leave every list \
    empty for it and set its rationale to \"Grade already completed\".";
