// Assistant prompt templates.
// Role assistants send their fixed system prompt with the caller's text as the
// user turn. Project-manager helpers fill a template and send it under
// PM_ASSISTANT_SYSTEM.

pub const SALES_EXECUTIVE_SYSTEM: &str = "You are a top-tier AI Sales Executive. \
    You help generate leads, write cold outreach emails, and suggest sales strategies \
    for new products or services.";

pub const MARKETING_EXECUTIVE_SYSTEM: &str = "You are a creative and strategic AI Marketing Executive. \
    You can create social media posts, ad campaigns, email content, SEO keywords, and content ideas.";

pub const PM_ASSISTANT_SYSTEM: &str = "You are a helpful project manager assistant.";

/// Token cap for project-manager helper calls.
pub const PM_MAX_TOKENS: u32 = 500;

/// Replace `{project_goal}`.
pub const TASK_BREAKDOWN_PROMPT: &str = r#"Break down this project into phases and tasks:
"{project_goal}"

Format:
{
    "projectTitle": "...",
    "phases": [
        {
            "phase": "...",
            "tasks": ["...", "..."],
            "duration": "..."
        }
    ]
}"#;

/// Replace `{updates_json}`.
pub const STATUS_UPDATE_PROMPT: &str = r#"Based on these updates from team members, give a status summary:
{updates_json}

Include:
- Tasks completed / pending
- Delays if any
- Project health
- ETA for completion"#;

/// Replace `{plan_json}`.
pub const RISK_ANALYSIS_PROMPT: &str = r#"Analyze this project plan for possible risks:
{plan_json}

Return:
{
    "detectedRisk": "...",
    "recommendation": "...",
    "riskLevel": "Low/Medium/High"
}"#;

/// Replace `{project_name}`, `{description}`, `{team_members}`, `{deadline}`,
/// `{stakeholders}`, `{budget}`, `{tech_stack}`.
pub const GENERATE_TIMELINE_PROMPT: &str = r#"You're an expert project planner.

Based on the following project information, create a project timeline with phases, estimated durations, and key milestones.

- Project Name: {project_name}
- Description: {description}
- Team Members: {team_members}
- Stakeholders: {stakeholders}
- Deadline: {deadline}
- Budget: ${budget}
- Tech Stack: {tech_stack}

Output in this format:
{
    "timeline": [
        {
            "phase": "Planning",
            "duration_days": 3,
            "milestones": ["Define goals", "Select tools"]
        },
        {
            "phase": "Development",
            "duration_days": 10,
            "milestones": ["Set up frontend", "Build backend API"]
        }
    ],
    "estimated_completion": "April 28, 2025"
}"#;
