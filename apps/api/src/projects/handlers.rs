//! Axum route handlers for the Projects API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::models::project::{ProjectRecord, ProjectSummary, Task, WorkStatus};
use crate::projects::chat::{respond, ChatRequest};
use crate::projects::views::{
    build_risk_report, build_status_email, build_timeline, build_weekly_plan, EmailTemplate,
    RiskReport, TimelineData, WeeklyPlan,
};
use crate::state::AppState;

const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProjectCreatedResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub name: String,
    pub assignee: String,
    pub deadline: String,
    pub priority: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectSummary>>, AppError> {
    let projects = state.store.list().await?;
    Ok(Json(
        projects
            .iter()
            .map(|(id, record)| ProjectSummary::new(id, record))
            .collect(),
    ))
}

/// GET /api/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectRecord>, AppError> {
    Ok(Json(state.store.get(&project_id).await?))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(record): Json<ProjectRecord>,
) -> Result<Json<ProjectCreatedResponse>, AppError> {
    if record.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let id = state.store.create(record).await?;
    Ok(Json(ProjectCreatedResponse {
        message: "Project created".to_string(),
        id,
    }))
}

/// DELETE /api/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete(&project_id).await?;
    state.chats.remove(&project_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/:id/chat
///
/// Always answers 200 once the request validates; a failed completion call
/// comes back as a marked synthetic reply.
pub async fn handle_send_chat(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let reply = respond(
        &state.store,
        state.llm.as_ref(),
        &state.chats,
        &project_id,
        &request,
    )
    .await?;
    Ok(Json(reply))
}

/// GET /api/projects/:id/chat
pub async fn handle_get_chat(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    state.store.get(&project_id).await?;
    Ok(Json(state.chats.messages(&project_id).await))
}

/// POST /api/projects/:id/tasks
pub async fn handle_create_task(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<TaskCreate>,
) -> Result<Json<Task>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("task name cannot be empty".to_string()));
    }
    let priority = request.priority.trim().to_lowercase();
    if !PRIORITIES.contains(&priority.as_str()) {
        return Err(AppError::Validation(format!(
            "priority must be one of: {}",
            PRIORITIES.join(", ")
        )));
    }

    let task = state
        .store
        .update(&project_id, move |record| {
            let id = next_task_id(&record.tasks).ok_or_else(|| {
                AppError::Validation("project has no task identifiers left".to_string())
            })?;
            let task = Task {
                id,
                name: request.name,
                assignee: request.assignee,
                deadline: request.deadline,
                priority,
                description: request.description,
                status: WorkStatus::NotStarted,
            };
            record.tasks.push(task.clone());
            Ok::<_, AppError>(task)
        })
        .await??;

    info!("Created task {} on project {project_id}", task.id);
    Ok(Json(task))
}

/// GET /api/projects/:id/timeline
pub async fn handle_get_timeline(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<TimelineData>, AppError> {
    let record = state.store.get(&project_id).await?;
    Ok(Json(build_timeline(&record, Utc::now().date_naive())))
}

/// POST /api/projects/:id/timeline/weekly-plan
pub async fn handle_weekly_plan(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<WeeklyPlan>, AppError> {
    let record = state.store.get(&project_id).await?;
    Ok(Json(build_weekly_plan(&record)))
}

/// POST /api/projects/:id/risk
pub async fn handle_risk_report(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<RiskReport>, AppError> {
    let record = state.store.get(&project_id).await?;
    Ok(Json(build_risk_report(&record)))
}

/// POST /api/projects/:id/email/generate
pub async fn handle_generate_email(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(template): Json<EmailTemplate>,
) -> Result<Json<EmailTemplate>, AppError> {
    let record = state.store.get(&project_id).await?;
    Ok(Json(build_status_email(&record, &template)))
}

/// POST /api/projects/:id/email/send
///
/// No mail transport is wired up; the email is logged and acknowledged.
pub async fn handle_send_email(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(template): Json<EmailTemplate>,
) -> Result<Json<MessageResponse>, AppError> {
    let record = state.store.get(&project_id).await?;
    info!(
        "Sending email for project {project_id} ({}): recipient={}, subject={}",
        record.name, template.recipient, template.subject
    );
    Ok(Json(MessageResponse {
        message: "Email sent successfully.".to_string(),
    }))
}

/// One past the highest existing task id, or `None` once ids are exhausted.
fn next_task_id(tasks: &[Task]) -> Option<u32> {
    tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u32) -> Task {
        Task {
            id,
            name: format!("Task {id}"),
            assignee: "Alice".to_string(),
            deadline: "2025-06-01".to_string(),
            priority: "low".to_string(),
            description: None,
            status: WorkStatus::NotStarted,
        }
    }

    #[test]
    fn test_next_task_id() {
        assert_eq!(next_task_id(&[]), Some(1));
        assert_eq!(next_task_id(&[task(4), task(2)]), Some(5));
        assert_eq!(next_task_id(&[task(u32::MAX)]), None);
    }
}
