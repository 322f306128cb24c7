//! Project records as they live in the store document.
//!
//! Records come from a loosely-validated front-end payload, so numeric fields
//! accept either JSON numbers or numeric strings and every field except `name`
//! is optional. Key names follow the stored document (`team_members`,
//! `additional_info`, camelCase scalars).
//!
//! A field of the wrong shape reads as absent instead of failing the record:
//! text fields take any scalar, list elements that do not decode are dropped,
//! and stakeholders may be bare names.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub skills: Option<String>,
    #[serde(
        rename = "hoursPerWeek",
        alias = "working_hours_per_week",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours_per_week: Option<f64>,
    #[serde(
        rename = "hourlyWage",
        alias = "hourly_wage",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub hourly_wage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StakeholderShape")]
pub struct Stakeholder {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Stakeholders are stored either as full entries or as bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum StakeholderShape {
    Name(String),
    Entry {
        name: String,
        #[serde(default, deserialize_with = "lenient_text")]
        email: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        role: Option<String>,
    },
}

impl From<StakeholderShape> for Stakeholder {
    fn from(shape: StakeholderShape) -> Self {
        match shape {
            StakeholderShape::Name(name) => Stakeholder {
                name,
                email: None,
                role: None,
            },
            StakeholderShape::Entry { name, email, role } => Stakeholder { name, email, role },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub objectives: Option<String>,
    #[serde(
        rename = "successCriteria",
        alias = "success_criteria",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub success_criteria: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::NotStarted => "not-started",
            WorkStatus::InProgress => "in-progress",
            WorkStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u32,
    pub name: String,
    /// ISO date (`YYYY-MM-DD`) or RFC 3339 timestamp.
    pub deadline: String,
    pub status: WorkStatus,
    #[serde(default)]
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub assignee: String,
    pub deadline: String,
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: WorkStatus,
}

/// One tracked project. The identifier is the store key, not a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(alias = "project_name")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub progress: Option<f64>,
    #[serde(
        rename = "startDate",
        alias = "start_date",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget: Option<f64>,
    #[serde(
        rename = "budgetUsed",
        alias = "budget_used",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_used: Option<f64>,
    #[serde(
        rename = "techStack",
        alias = "tech_stack",
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tech_stack: Option<String>,
    #[serde(
        rename = "currentStage",
        alias = "current_stage",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_stage: Option<String>,
    #[serde(
        alias = "buffer_days",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer: Option<f64>,
    #[serde(
        rename = "team_members",
        alias = "teamMembers",
        default,
        deserialize_with = "lenient_list"
    )]
    pub team_members: Vec<TeamMember>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub stakeholders: Vec<Stakeholder>,
    #[serde(
        rename = "additional_info",
        alias = "additionalInfo",
        default,
        deserialize_with = "lenient_info",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_info: Option<AdditionalInfo>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub milestones: Vec<Milestone>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tasks: Vec<Task>,
}

/// Row returned by the project listing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub deadline: Option<String>,
    pub progress: f64,
    pub team_size: usize,
}

impl ProjectSummary {
    pub fn new(id: &str, record: &ProjectRecord) -> Self {
        Self {
            id: id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            status: record
                .status
                .clone()
                .unwrap_or_else(|| "Not Started".to_string()),
            deadline: record.deadline.clone(),
            progress: record.progress.unwrap_or(0.0),
            team_size: record.team_members.len(),
        }
    }
}

/// Accepts a JSON number, a numeric string, or null. Anything else reads as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Accepts a string, or a number or bool rendered as text. Anything else reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Decodes each element on its own and drops the ones that do not fit.
/// A non-list value reads as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// An object decodes as usual; a non-blank string is taken as the objectives.
fn lenient_info<'de, D>(deserializer: D) -> Result<Option<AdditionalInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(AdditionalInfo {
            objectives: Some(s),
            success_criteria: None,
        }),
        _ => None,
    })
}

/// Accepts a string or a list of strings (joined with `, `).
fn string_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    })
}
