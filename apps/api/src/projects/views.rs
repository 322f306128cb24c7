//! Derived project views: timeline, risk report, status email, weekly plan.
//!
//! Pure functions over a `ProjectRecord`; handlers load the record and pass
//! in anything time-dependent.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::project::{Milestone, ProjectRecord, WorkStatus};

// ────────────────────────────────────────────────────────────────────────────
// Timeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineData {
    pub milestones: Vec<Milestone>,
    pub insights: Vec<Insight>,
}

pub fn build_timeline(record: &ProjectRecord, today: NaiveDate) -> TimelineData {
    let mut insights = vec![Insight {
        kind: InsightKind::Info,
        message: "Ensure all milestones are on schedule.".to_string(),
    }];

    if let (Some(budget), Some(used)) = (record.budget, record.budget_used) {
        if used > budget {
            insights.push(Insight {
                kind: InsightKind::Warning,
                message: format!("Budget overrun: ${used} spent against a budget of ${budget}."),
            });
        }
    }

    for milestone in &record.milestones {
        let overdue = milestone.status != WorkStatus::Completed
            && parse_date(&milestone.deadline).is_some_and(|due| due < today);
        if overdue {
            insights.push(Insight {
                kind: InsightKind::Warning,
                message: format!(
                    "Milestone '{}' is past its deadline ({}).",
                    milestone.name, milestone.deadline
                ),
            });
        }
    }

    TimelineData {
        milestones: record.milestones.clone(),
        insights,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Risk
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Risk {
    pub description: String,
    pub impact: String,
    pub probability: u8,
    pub mitigation: String,
    pub contingency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub report: String,
    pub risks: Vec<Risk>,
    pub completion_probability: u8,
}

fn standard_risks() -> Vec<Risk> {
    vec![
        Risk {
            description: "Potential delay in design phase".to_string(),
            impact: "high".to_string(),
            probability: 70,
            mitigation: "Increase design team hours".to_string(),
            contingency: "Outsource design review".to_string(),
        },
        Risk {
            description: "Budget overrun risk".to_string(),
            impact: "medium".to_string(),
            probability: 40,
            mitigation: "Regular cost reviews".to_string(),
            contingency: "Reallocate funds from marketing".to_string(),
        },
    ]
}

pub fn build_risk_report(record: &ProjectRecord) -> RiskReport {
    let risks = standard_risks();

    let report = std::iter::once("Risk Analysis Report:".to_string())
        .chain(risks.iter().enumerate().map(|(i, r)| {
            format!(
                "{}. {} ({} Impact, {}% probability)",
                i + 1,
                r.description,
                r.impact,
                r.probability
            )
        }))
        .collect::<Vec<_>>()
        .join("\n");

    RiskReport {
        report,
        risks,
        completion_probability: completion_probability(record),
    }
}

/// 60 at zero progress up to 90 at completion, minus a penalty when budget
/// burn runs ahead of progress. Always within 60..=90.
pub fn completion_probability(record: &ProjectRecord) -> u8 {
    let progress = record.progress.unwrap_or(0.0).clamp(0.0, 100.0) / 100.0;
    let mut score = 60.0 + progress * 30.0;

    if let (Some(budget), Some(used)) = (record.budget, record.budget_used) {
        if budget > 0.0 {
            let burn = used / budget;
            if burn > progress {
                score -= (burn - progress) * 30.0;
            }
        }
    }

    score.round().clamp(60.0, 90.0) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Email
// ────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    /// "all" or a specific stakeholder name.
    pub recipient: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_true")]
    pub include_timeline: bool,
    #[serde(default = "default_true")]
    pub include_task_summary: bool,
}

pub fn build_status_email(record: &ProjectRecord, template: &EmailTemplate) -> EmailTemplate {
    let mut content = format!(
        "Status Update for {}:\n\nProgress: {}% complete.\n",
        record.name,
        record.progress.unwrap_or(0.0)
    );

    if template.include_timeline {
        content.push_str("Upcoming Milestones:\n");
        for milestone in record
            .milestones
            .iter()
            .filter(|m| m.status != WorkStatus::Completed)
        {
            let due = parse_date(&milestone.deadline)
                .map(|d| d.format("%b %d").to_string())
                .unwrap_or_else(|| milestone.deadline.clone());
            content.push_str(&format!("- {}: due {}\n", milestone.name, due));
        }
    }

    if template.include_task_summary {
        content.push_str("\nTask Summary:\n");
        for task in &record.tasks {
            content.push_str(&format!(
                "- {} (Status: {})\n",
                task.name,
                task.status.as_str()
            ));
        }
    }

    let subject = if template.subject.trim().is_empty() {
        format!("{} - Status Update", record.name)
    } else {
        template.subject.clone()
    };

    EmailTemplate {
        recipient: template.recipient.clone(),
        subject,
        content,
        include_timeline: template.include_timeline,
        include_task_summary: template.include_task_summary,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Weekly plan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub member: String,
    pub skills: Option<String>,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlan {
    pub message: String,
    pub assignments: Vec<Assignment>,
}

/// One assignment per team member listing their open tasks.
pub fn build_weekly_plan(record: &ProjectRecord) -> WeeklyPlan {
    let assignments = record
        .team_members
        .iter()
        .map(|member| Assignment {
            member: member.name.clone(),
            skills: member.skills.clone(),
            tasks: record
                .tasks
                .iter()
                .filter(|t| t.status != WorkStatus::Completed && t.assignee == member.name)
                .map(|t| t.name.clone())
                .collect(),
        })
        .collect();

    WeeklyPlan {
        message: "Weekly plan generated.".to_string(),
        assignments,
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::{Task, TeamMember};

    fn milestone(id: u32, name: &str, deadline: &str, status: WorkStatus) -> Milestone {
        Milestone {
            id,
            name: name.to_string(),
            deadline: deadline.to_string(),
            status,
            progress: 0,
        }
    }

    fn task(id: u32, name: &str, assignee: &str, status: WorkStatus) -> Task {
        Task {
            id,
            name: name.to_string(),
            assignee: assignee.to_string(),
            deadline: "2025-05-01".to_string(),
            priority: "medium".to_string(),
            description: None,
            status,
        }
    }

    fn sample() -> ProjectRecord {
        ProjectRecord {
            name: "ProxyForce Alpha".to_string(),
            progress: Some(45.0),
            budget: Some(100000.0),
            budget_used: Some(45000.0),
            milestones: vec![
                milestone(1, "Design Complete", "2025-03-01", WorkStatus::Completed),
                milestone(2, "Prototype", "2025-04-10", WorkStatus::InProgress),
                milestone(3, "Final Release", "2025-06-30T00:00:00Z", WorkStatus::NotStarted),
            ],
            team_members: vec![
                TeamMember {
                    name: "Alice".to_string(),
                    skills: Some("Rust".to_string()),
                    ..Default::default()
                },
                TeamMember {
                    name: "Bob".to_string(),
                    ..Default::default()
                },
            ],
            tasks: vec![
                task(1, "Wire API", "Alice", WorkStatus::InProgress),
                task(2, "Write docs", "Alice", WorkStatus::Completed),
                task(3, "Mockups", "Bob", WorkStatus::NotStarted),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_timeline_on_schedule_has_only_info() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let timeline = build_timeline(&sample(), today);
        assert_eq!(timeline.milestones.len(), 3);
        assert_eq!(timeline.insights.len(), 1);
        assert_eq!(timeline.insights[0].kind, InsightKind::Info);
    }

    #[test]
    fn test_timeline_flags_overdue_and_overrun() {
        let mut record = sample();
        record.budget_used = Some(120000.0);
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        let timeline = build_timeline(&record, today);
        let warnings: Vec<_> = timeline
            .insights
            .iter()
            .filter(|i| i.kind == InsightKind::Warning)
            .collect();

        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.message.contains("Prototype")));
        assert!(warnings.iter().any(|w| w.message.starts_with("Budget overrun")));
    }

    #[test]
    fn test_risk_report_text() {
        let report = build_risk_report(&sample());
        assert_eq!(
            report.report,
            "Risk Analysis Report:\n\
             1. Potential delay in design phase (high Impact, 70% probability)\n\
             2. Budget overrun risk (medium Impact, 40% probability)"
        );
        assert_eq!(report.risks.len(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("completionProbability").is_some());
    }

    #[test]
    fn test_completion_probability_bounds() {
        let mut record = sample();
        record.progress = Some(100.0);
        record.budget_used = Some(50000.0);
        assert_eq!(completion_probability(&record), 90);

        record.progress = Some(0.0);
        record.budget_used = Some(500000.0);
        assert_eq!(completion_probability(&record), 60);

        let empty = ProjectRecord {
            name: "Empty".to_string(),
            ..Default::default()
        };
        assert_eq!(completion_probability(&empty), 60);
    }

    #[test]
    fn test_completion_probability_tracks_progress() {
        // 45% progress with matching burn: 60 + 0.45 * 30 = 73.5 -> 74
        assert_eq!(completion_probability(&sample()), 74);
    }

    #[test]
    fn test_status_email_content() {
        let template = EmailTemplate {
            recipient: "all".to_string(),
            subject: String::new(),
            content: String::new(),
            include_timeline: true,
            include_task_summary: true,
        };
        let email = build_status_email(&sample(), &template);

        assert_eq!(email.subject, "ProxyForce Alpha - Status Update");
        assert_eq!(
            email.content,
            "Status Update for ProxyForce Alpha:\n\n\
             Progress: 45% complete.\n\
             Upcoming Milestones:\n\
             - Prototype: due Apr 10\n\
             - Final Release: due Jun 30\n\
             \nTask Summary:\n\
             - Wire API (Status: in-progress)\n\
             - Write docs (Status: completed)\n\
             - Mockups (Status: not-started)\n"
        );
    }

    #[test]
    fn test_status_email_respects_flags_and_subject() {
        let template = EmailTemplate {
            recipient: "Carol".to_string(),
            subject: "Weekly".to_string(),
            content: String::new(),
            include_timeline: false,
            include_task_summary: false,
        };
        let email = build_status_email(&sample(), &template);
        assert_eq!(email.subject, "Weekly");
        assert_eq!(email.recipient, "Carol");
        assert!(!email.content.contains("Milestones"));
        assert!(!email.content.contains("Task Summary"));
    }

    #[test]
    fn test_email_template_defaults() {
        let template: EmailTemplate =
            serde_json::from_value(serde_json::json!({"recipient": "all"})).unwrap();
        assert!(template.include_timeline);
        assert!(template.include_task_summary);
        assert!(template.subject.is_empty());
    }

    #[test]
    fn test_weekly_plan_lists_open_tasks_per_member() {
        let plan = build_weekly_plan(&sample());
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.assignments[0].member, "Alice");
        assert_eq!(plan.assignments[0].tasks, vec!["Wire API".to_string()]);
        assert_eq!(plan.assignments[1].tasks, vec!["Mockups".to_string()]);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2025-04-10"),
            NaiveDate::from_ymd_opt(2025, 4, 10)
        );
        assert_eq!(
            parse_date("2025-06-30T12:00:00+00:00"),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(parse_date("next tuesday"), None);
    }
}
