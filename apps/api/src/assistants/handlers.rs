//! Axum route handlers for the role assistants and project-manager helpers.
//!
//! Role assistants surface backend failures as 502. Project-manager helpers
//! answer 200 with either `{"response": ...}` or `{"error": ...}`.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::assistants::prompts::{
    GENERATE_TIMELINE_PROMPT, MARKETING_EXECUTIVE_SYSTEM, PM_ASSISTANT_SYSTEM, PM_MAX_TOKENS,
    RISK_ANALYSIS_PROMPT, SALES_EXECUTIVE_SYSTEM, STATUS_UPDATE_PROMPT, TASK_BREAKDOWN_PROMPT,
};
use crate::errors::AppError;
use crate::llm_client::{CompletionBackend, Message};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HelperReply {
    Response { response: String },
    Error { error: String },
}

#[derive(Debug, Deserialize)]
pub struct TaskBreakdownRequest {
    pub project_goal: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlannedMember {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub working_hours_per_week: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectInitRequest {
    pub project_name: String,
    pub description: String,
    #[serde(default)]
    pub team_members: Vec<PlannedMember>,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    pub budget: f64,
    /// `YYYY-MM-DD`
    pub deadline: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectInitResponse {
    pub message: String,
    pub project_summary: ProjectInitRequest,
    pub available_features: Vec<&'static str>,
}

pub const PLANNER_FEATURES: [&str; 6] = [
    "Timeline Generator",
    "Gantt Chart Generator",
    "Smart Task Assignment",
    "Email + Calendar Integration",
    "Change History Log",
    "Task Update Interface",
];

/// Fixed system prompt for a role assistant slug, if the role exists.
pub fn role_system_prompt(role: &str) -> Option<&'static str> {
    match role {
        "sales-executive" => Some(SALES_EXECUTIVE_SYSTEM),
        "marketing-executive" => Some(MARKETING_EXECUTIVE_SYSTEM),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/assistants/:role
pub async fn handle_role_assistant(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(body): Json<PromptBody>,
) -> Result<Json<AssistantResponse>, AppError> {
    let system = role_system_prompt(&role)
        .ok_or_else(|| AppError::NotFound(format!("Assistant role '{role}' not found")))?;
    if body.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let messages = [Message::system(system), Message::user(body.prompt)];
    let response = state
        .llm
        .complete(&messages, None)
        .await
        .map_err(|e| AppError::Llm(format!("{role} assistant call failed: {e}")))?;

    Ok(Json(AssistantResponse { response }))
}

/// POST /api/project-manager/initialize
///
/// Echoes the plan back with the planner features on offer. Nothing is stored.
pub async fn handle_initialize_project(
    Json(request): Json<ProjectInitRequest>,
) -> Json<ProjectInitResponse> {
    info!(
        "Initializing plan for '{}' ({} team members)",
        request.project_name,
        request.team_members.len()
    );
    Json(ProjectInitResponse {
        message: "Project initialized successfully!".to_string(),
        project_summary: request,
        available_features: PLANNER_FEATURES.to_vec(),
    })
}

/// POST /api/project-manager/task-breakdown
pub async fn handle_task_breakdown(
    State(state): State<AppState>,
    Json(request): Json<TaskBreakdownRequest>,
) -> Json<HelperReply> {
    let prompt = TASK_BREAKDOWN_PROMPT.replace("{project_goal}", &request.project_goal);
    Json(ask_pm(state.llm.as_ref(), &prompt).await)
}

/// POST /api/project-manager/status-update
pub async fn handle_status_update(
    State(state): State<AppState>,
    Json(updates): Json<Vec<Value>>,
) -> Result<Json<HelperReply>, AppError> {
    let updates_json = serde_json::to_string_pretty(&updates)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize updates: {e}")))?;
    let prompt = STATUS_UPDATE_PROMPT.replace("{updates_json}", &updates_json);
    Ok(Json(ask_pm(state.llm.as_ref(), &prompt).await))
}

/// POST /api/project-manager/risk-analysis
pub async fn handle_risk_analysis(
    State(state): State<AppState>,
    Json(plan): Json<Value>,
) -> Result<Json<HelperReply>, AppError> {
    if !plan.is_object() {
        return Err(AppError::Validation(
            "plan data must be a JSON object".to_string(),
        ));
    }
    let plan_json = serde_json::to_string_pretty(&plan)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize plan: {e}")))?;
    let prompt = RISK_ANALYSIS_PROMPT.replace("{plan_json}", &plan_json);
    Ok(Json(ask_pm(state.llm.as_ref(), &prompt).await))
}

/// POST /api/project-manager/generate-timeline
pub async fn handle_generate_timeline(
    State(state): State<AppState>,
    Json(request): Json<ProjectInitRequest>,
) -> Result<Json<HelperReply>, AppError> {
    let prompt = build_timeline_prompt(&request)?;
    Ok(Json(ask_pm(state.llm.as_ref(), &prompt).await))
}

fn build_timeline_prompt(request: &ProjectInitRequest) -> Result<String, AppError> {
    let deadline = NaiveDate::parse_from_str(request.deadline.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("deadline must be formatted YYYY-MM-DD".to_string()))?
        .format("%B %d, %Y")
        .to_string();

    let team_members = request
        .team_members
        .iter()
        .map(|m| match m.working_hours_per_week {
            Some(hours) => format!("{} ({}; {hours}h/week)", m.name, m.skills.join(", ")),
            None => format!("{} ({})", m.name, m.skills.join(", ")),
        })
        .collect::<Vec<_>>()
        .join("; ");

    Ok(GENERATE_TIMELINE_PROMPT
        .replace("{project_name}", &request.project_name)
        .replace("{description}", &request.description)
        .replace("{team_members}", &team_members)
        .replace("{stakeholders}", &request.stakeholders.join(", "))
        .replace("{deadline}", &deadline)
        .replace("{budget}", &request.budget.to_string())
        .replace("{tech_stack}", &request.tech_stack.join(", ")))
}

async fn ask_pm(llm: &dyn CompletionBackend, prompt: &str) -> HelperReply {
    let messages = [Message::system(PM_ASSISTANT_SYSTEM), Message::user(prompt)];
    match llm.complete(&messages, Some(PM_MAX_TOKENS)).await {
        Ok(response) => HelperReply::Response { response },
        Err(e) => {
            warn!("Project-manager helper call failed: {e}");
            HelperReply::Error {
                error: e.to_string(),
            }
        }
    }
}
