//! Static lookup tables for the front end: role themes, tiers, UI themes,
//! assistant personas, and project stages.

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const DEFAULT_ASSISTANT_ROLE: &str = "project-manager";

#[derive(Debug, Clone, Serialize)]
pub struct RoleTheme {
    pub title: &'static str,
    pub color: &'static str,
    pub gradient: &'static str,
    pub glow: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierInfo {
    pub years: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiTheme {
    pub primary: &'static str,
    pub light: &'static str,
    pub border: &'static str,
    pub hover: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantPersona {
    pub name: &'static str,
    pub title: &'static str,
    pub experience: u8,
    pub avatar: &'static str,
    pub greeting: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_title: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStage {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn role_theme(role: &str) -> Option<RoleTheme> {
    let theme = match role {
        "pm" => RoleTheme {
            title: "Project Manager",
            color: "#3B82F6",
            gradient: "from-blue-900 to-blue-700",
            glow: "bg-blue-600",
        },
        "sales" => RoleTheme {
            title: "Sales Executive",
            color: "#EF4444",
            gradient: "from-red-900 to-red-700",
            glow: "bg-red-600",
        },
        "marketing" => RoleTheme {
            title: "Marketing Analyst",
            color: "#22C55E",
            gradient: "from-green-900 to-green-700",
            glow: "bg-green-600",
        },
        _ => return None,
    };
    Some(theme)
}

pub fn tier_info(tier: &str) -> Option<TierInfo> {
    match tier {
        "1" => Some(TierInfo {
            years: "2 Years",
            title: "Tier 1",
        }),
        "2" => Some(TierInfo {
            years: "5 Years",
            title: "Tier 2",
        }),
        "3" => Some(TierInfo {
            years: "10+ Years",
            title: "Tier 3",
        }),
        _ => None,
    }
}

pub fn tier_title(tier: &str) -> Option<&'static str> {
    match tier {
        "1" => Some("Apprentice"),
        "2" => Some("Adept"),
        "3" => Some("Master"),
        _ => None,
    }
}

/// Unknown roles fall back to the project-manager theme.
pub fn ui_theme(role: &str) -> UiTheme {
    match role.to_lowercase().as_str() {
        "sales" => UiTheme {
            primary: "bg-red-500",
            light: "bg-red-100",
            border: "border border-red-300",
            hover: "hover:bg-red-600",
        },
        "marketing" => UiTheme {
            primary: "bg-green-500",
            light: "bg-green-100",
            border: "border border-green-300",
            hover: "hover:bg-green-600",
        },
        _ => UiTheme {
            primary: "bg-blue-500",
            light: "bg-blue-100",
            border: "border border-blue-300",
            hover: "hover:bg-blue-600",
        },
    }
}

/// Unknown roles fall back to the project-manager persona.
pub fn assistant_persona(role: &str, tier: &str) -> AssistantPersona {
    let mut persona = match role.to_lowercase().as_str() {
        "sales" => AssistantPersona {
            name: "Max",
            title: "Sales Executive",
            experience: 5,
            avatar: "https://randomuser.me/api/portraits/men/75.jpg",
            greeting: "Hi, I'm Max, your sales AI. What sales insights can I provide today?",
            tier_title: None,
        },
        "marketing" => AssistantPersona {
            name: "Lara",
            title: "Marketing Analyst",
            experience: 7,
            avatar: "https://randomuser.me/api/portraits/women/42.jpg",
            greeting: "Hey, I'm Lara, your marketing AI. Let's analyze some trends!",
            tier_title: None,
        },
        _ => AssistantPersona {
            name: "Ava",
            title: "Project Manager",
            experience: 8,
            avatar: "https://randomuser.me/api/portraits/women/68.jpg",
            greeting: "Hello, I'm Ava, your project manager AI. How can I assist you today?",
            tier_title: None,
        },
    };
    persona.tier_title = tier_title(tier);
    persona
}

pub fn project_stages() -> Vec<ProjectStage> {
    [
        ("initial", "Initial Planning"),
        ("development", "Development"),
        ("testing", "Testing"),
        ("deployment", "Deployment"),
        ("maintenance", "Maintenance"),
    ]
    .into_iter()
    .map(|(value, label)| ProjectStage { value, label })
    .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssistantQuery {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_tier")]
    pub tier: String,
}

fn default_role() -> String {
    DEFAULT_ASSISTANT_ROLE.to_string()
}

fn default_tier() -> String {
    "1".to_string()
}

/// GET /api/roles/:role/theme
pub async fn handle_role_theme(Path(role): Path<String>) -> Result<Json<RoleTheme>, AppError> {
    role_theme(&role)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Role not found".to_string()))
}

/// GET /api/tiers/:tier
pub async fn handle_tier(Path(tier): Path<String>) -> Result<Json<TierInfo>, AppError> {
    tier_info(&tier)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Tier not found".to_string()))
}

/// GET /api/theme/:role
pub async fn handle_ui_theme(Path(role): Path<String>) -> Json<UiTheme> {
    Json(ui_theme(&role))
}

/// GET /api/ai-assistant?role=&tier=
pub async fn handle_ai_assistant(Query(query): Query<AssistantQuery>) -> Json<AssistantPersona> {
    Json(assistant_persona(&query.role, &query.tier))
}

/// GET /api/project-stages
pub async fn handle_project_stages() -> Json<Vec<ProjectStage>> {
    Json(project_stages())
}
