//! Prompt Compiler. Renders a project record plus a role label into a system
//! prompt, and pairs it with the user's message as a two-entry conversation.
//!
//! Rendering is a pure function of its inputs. Every scalar label is always
//! emitted; absent values render as `N/A` so the prompt keeps a stable shape.
//!
//! Role and project fields are interpolated verbatim. The HTTP layer bounds
//! the role label; stored fields are trusted as-is.

use tracing::warn;

use crate::llm_client::Message;
use crate::models::project::ProjectRecord;
use crate::prompt::prompts::{
    NOT_AVAILABLE, PERSONA_CLOSING, PERSONA_OPENING, PROJECT_NOT_FOUND_PROMPT,
};
use crate::store::{ProjectStore, StoreError};

/// A single chat turn against one project. Not persisted.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub project_id: String,
    pub role: String,
    pub user_message: String,
}

#[derive(Debug, Clone)]
pub struct CompiledPrompt {
    pub system_prompt: String,
    pub conversation: [Message; 2],
    /// False when the system prompt is the not-found fallback.
    pub project_found: bool,
}

/// Renders the system prompt for `role` acting on `record`.
/// Returns exactly `PROJECT_NOT_FOUND_PROMPT` when there is no record.
pub fn render_system_prompt(role: &str, project_id: &str, record: Option<&ProjectRecord>) -> String {
    let Some(record) = record else {
        return PROJECT_NOT_FOUND_PROMPT.to_string();
    };

    let mut lines: Vec<String> = Vec::new();

    lines.push(PERSONA_OPENING.replace("{role}", role));
    lines.push(String::new());

    lines.push(format!("Project ID: {}", text(Some(project_id))));
    lines.push(format!("Name: {}", text(Some(record.name.as_str()))));
    lines.push(format!("Description: {}", text(record.description.as_deref())));
    lines.push(format!("Status: {}", text(record.status.as_deref())));
    lines.push(format!("Progress: {}", suffixed(record.progress, "%")));
    lines.push(format!("Deadline: {}", text(record.deadline.as_deref())));
    lines.push(format!(
        "Budget: {} (Used: {})",
        money(record.budget),
        money(record.budget_used)
    ));
    lines.push(format!("Tech Stack: {}", text(record.tech_stack.as_deref())));
    lines.push(format!("Current Stage: {}", text(record.current_stage.as_deref())));
    lines.push(format!("Buffer: {}", suffixed(record.buffer, " days")));
    lines.push(String::new());

    lines.push("Team Members:".to_string());
    for member in &record.team_members {
        lines.push(format!(
            "- {} ({})",
            text(Some(member.name.as_str())),
            text(member.email.as_deref())
        ));
    }
    lines.push(String::new());

    lines.push("Stakeholders:".to_string());
    for stakeholder in &record.stakeholders {
        lines.push(format!(
            "- {} ({}, {})",
            text(Some(stakeholder.name.as_str())),
            text(stakeholder.email.as_deref()),
            text(stakeholder.role.as_deref())
        ));
    }
    lines.push(String::new());

    let info = record.additional_info.as_ref();
    lines.push(format!(
        "Objectives: {}",
        text(info.and_then(|i| i.objectives.as_deref()))
    ));
    lines.push(format!(
        "Success Criteria: {}",
        text(info.and_then(|i| i.success_criteria.as_deref()))
    ));
    lines.push(String::new());

    lines.push(PERSONA_CLOSING.replace("{role}", role));

    lines.join("\n")
}

/// Builds the conversation sent to the completion backend: system first,
/// then the user's message verbatim. Single turn, no history.
pub fn build_conversation(system_prompt: &str, user_message: &str) -> [Message; 2] {
    [Message::system(system_prompt), Message::user(user_message)]
}

/// Looks up the project and compiles the prompt for one chat turn.
///
/// An unknown project degrades to the not-found prompt instead of failing.
/// An unreadable store still fails.
pub async fn compile(
    store: &ProjectStore,
    request: &PromptRequest,
) -> Result<CompiledPrompt, StoreError> {
    let record = match store.get(&request.project_id).await {
        Ok(record) => Some(record),
        Err(StoreError::NotFound(id)) => {
            warn!("Compiling prompt for unknown project {id}; using fallback context");
            None
        }
        Err(e) => return Err(e),
    };

    let system_prompt = render_system_prompt(&request.role, &request.project_id, record.as_ref());
    let conversation = build_conversation(&system_prompt, &request.user_message);

    Ok(CompiledPrompt {
        system_prompt,
        conversation,
        project_found: record.is_some(),
    })
}

fn text(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

fn suffixed(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v}{suffix}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v}"),
        None => NOT_AVAILABLE.to_string(),
    }
}
