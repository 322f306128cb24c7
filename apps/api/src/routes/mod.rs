pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assistants::handlers as assistants;
use crate::catalog;
use crate::projects::handlers as projects;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Projects API
        .route(
            "/api/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route(
            "/api/projects/:id",
            get(projects::handle_get_project).delete(projects::handle_delete_project),
        )
        .route(
            "/api/projects/:id/chat",
            get(projects::handle_get_chat).post(projects::handle_send_chat),
        )
        .route("/api/projects/:id/tasks", post(projects::handle_create_task))
        .route(
            "/api/projects/:id/timeline",
            get(projects::handle_get_timeline),
        )
        .route(
            "/api/projects/:id/timeline/weekly-plan",
            post(projects::handle_weekly_plan),
        )
        .route("/api/projects/:id/risk", post(projects::handle_risk_report))
        .route(
            "/api/projects/:id/email/generate",
            post(projects::handle_generate_email),
        )
        .route(
            "/api/projects/:id/email/send",
            post(projects::handle_send_email),
        )
        // Static catalog
        .route("/api/roles/:role/theme", get(catalog::handle_role_theme))
        .route("/api/tiers/:tier", get(catalog::handle_tier))
        .route("/api/theme/:role", get(catalog::handle_ui_theme))
        .route("/api/ai-assistant", get(catalog::handle_ai_assistant))
        .route("/api/project-stages", get(catalog::handle_project_stages))
        // Assistants
        .route(
            "/api/assistants/:role",
            post(assistants::handle_role_assistant),
        )
        .route(
            "/api/project-manager/initialize",
            post(assistants::handle_initialize_project),
        )
        .route(
            "/api/project-manager/task-breakdown",
            post(assistants::handle_task_breakdown),
        )
        .route(
            "/api/project-manager/status-update",
            post(assistants::handle_status_update),
        )
        .route(
            "/api/project-manager/risk-analysis",
            post(assistants::handle_risk_analysis),
        )
        .route(
            "/api/project-manager/generate-timeline",
            post(assistants::handle_generate_timeline),
        )
        .with_state(state)
}
