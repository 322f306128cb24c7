// Role assistants (sales, marketing) and project-manager helper prompts.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod prompts;
