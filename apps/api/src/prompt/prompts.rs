// Prompt Compiler templates.
// Replace `{role}` before use. Everything between the opening and closing
// lines is rendered from the project record.

/// Returned verbatim in place of a system prompt when the project is unknown.
pub const PROJECT_NOT_FOUND_PROMPT: &str = "Project details not found.";

/// Placeholder for any absent project field.
pub const NOT_AVAILABLE: &str = "N/A";

pub const PERSONA_OPENING: &str =
    "You are acting as an expert {role} helping a team deliver the project described below.";

pub const PERSONA_CLOSING: &str = "Respond to the user's message as a professional {role}, \
    with full awareness of the project context above.";
